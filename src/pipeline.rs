//! End-to-end transformation.
//!
//! ```text
//! [&RawNode] ─▶ IdentifierIndex ─▶ UmlBuilder ─▶ GrammarBuilder ─▶ link ─▶ dedupe ─▶ Grammar
//! ```
//!
//! Each phase finishes before the next one starts. The first error aborts
//! the run.

use crate::config::TransformConfig;
use crate::error::TransformError;
use crate::grammar::{Grammar, GrammarBuilder, link};
use crate::interchange::RawNode;
use crate::uml::{IdentifierIndex, UmlBuilder};

/// Transform top-level model elements into a linked grammar.
pub fn transform<'a, I>(roots: I, config: &TransformConfig) -> Result<Grammar, TransformError>
where
    I: IntoIterator<Item = &'a RawNode>,
{
    let roots: Vec<&'a RawNode> = roots.into_iter().collect();

    tracing::debug!("[PIPELINE] Indexing {} top-level element(s)", roots.len());
    let index = IdentifierIndex::build(roots.iter().copied());

    tracing::debug!("[PIPELINE] Building UML model");
    let model = UmlBuilder::build(&roots, &index)?;

    tracing::debug!("[PIPELINE] Building grammar '{}'", config.grammar_name);
    let (mut grammar, pending) = GrammarBuilder::new(&model, config).build()?;

    tracing::debug!("[PIPELINE] Linking {} reference(s)", pending.len());
    link(&mut grammar, &pending)?;
    grammar.dedupe_primitives();

    tracing::info!(
        "Transformed {} UML element(s) into {} interface(s), {} union(s), {} primitive type(s)",
        model.roots().len(),
        grammar.interfaces().len(),
        grammar.unions().len(),
        grammar.primitive_types().len()
    );
    Ok(grammar)
}

/// Read an XMI document and transform its packaged elements.
#[cfg(feature = "interchange")]
pub fn transform_xmi(input: &[u8], config: &TransformConfig) -> Result<Grammar, TransformError> {
    let xmi = crate::interchange::Xmi;
    xmi.validate(input)?;
    let document = xmi.read(input)?;
    let roots = document.packaged_elements()?;
    transform(roots, config)
}

/// Transform the XMI file at `input` and write the rendered grammar to `output`.
#[cfg(feature = "interchange")]
pub fn generate(
    input: &std::path::Path,
    output: &std::path::Path,
    config: &TransformConfig,
) -> Result<Grammar, TransformError> {
    tracing::debug!("[PIPELINE] Reading {}", input.display());
    let bytes = std::fs::read(input)?;
    let grammar = transform_xmi(&bytes, config)?;

    let text = crate::grammar::render(&grammar);
    std::fs::write(output, text)?;
    tracing::info!("Wrote grammar '{}' to {}", grammar.name, output.display());
    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uml::kinds;

    #[test]
    fn test_transform_accepts_owned_slice() {
        let nodes = vec![
            RawNode::new()
                .with_attr("xmi:type", kinds::CLASS)
                .with_attr("xmi:id", "c1")
                .with_attr("name", "State"),
        ];
        let grammar = transform(&nodes, &TransformConfig::default()).unwrap();
        assert_eq!(grammar.interfaces().len(), 1);
        assert!(grammar.is_linked());
    }

    #[test]
    fn test_transform_empty_model() {
        let grammar = transform(std::iter::empty(), &TransformConfig::default()).unwrap();
        assert!(grammar.interfaces().is_empty());
        assert!(grammar.primitive_types().is_empty());
    }

    #[cfg(feature = "interchange")]
    #[test]
    fn test_transform_xmi_reports_malformed_input() {
        let err = transform_xmi(b"<xmi:XMI><uml:Model>", &TransformConfig::default()).unwrap_err();
        assert!(matches!(err, TransformError::Interchange(_)));
    }

    #[cfg(feature = "interchange")]
    #[test]
    fn test_transform_xmi_rejects_foreign_documents() {
        let err = transform_xmi(b"<html><body/></html>", &TransformConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Missing uml:Model or xmi:XMI root element"));
    }
}
