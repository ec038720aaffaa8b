//! XMI (XML Model Interchange) reading.
//!
//! Converts an XMI document into a [`RawNode`] tree. UML tools such as
//! Eclipse Papyrus serialise class models like this:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <uml:Model xmi:version="20131001" xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
//!            xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML" xmi:id="m1" name="fsm">
//!   <packagedElement xmi:type="uml:Class" xmi:id="c1" name="State">
//!     <ownedAttribute xmi:id="p1" name="name" type="dt1"/>
//!   </packagedElement>
//!   <packagedElement xmi:type="uml:DataType" xmi:id="dt1" name="String"/>
//! </uml:Model>
//! ```
//!
//! The model may also be wrapped in an `xmi:XMI` element alongside profile
//! applications; [`XmiDocument::packaged_elements`] finds it either way.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::InterchangeError;
use super::node::RawNode;

/// Tag of the UML model element.
pub const MODEL_TAG: &str = "uml:Model";
/// Tag of the optional XMI wrapper element.
pub const XMI_TAG: &str = "xmi:XMI";
/// Containment tag for the members of a model or package.
pub const PACKAGED_ELEMENT: &str = "packagedElement";
/// Discriminant of nested packages, whose members are flattened.
pub const PACKAGE_KIND: &str = "uml:Package";

/// XMI format handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xmi;

impl Xmi {
    /// Parse an XMI document.
    pub fn read(&self, input: &[u8]) -> Result<XmiDocument, InterchangeError> {
        XmiReader::new().read(input)
    }

    /// Quick check that the input looks like an XMI/UML document.
    ///
    /// Rejects input with neither a `uml:Model` nor an `xmi:XMI` element.
    pub fn validate(&self, input: &[u8]) -> Result<(), InterchangeError> {
        let content = std::str::from_utf8(input)
            .map_err(|e| InterchangeError::xml(format!("Invalid UTF-8: {e}")))?;

        if !content.contains(MODEL_TAG) && !content.contains(XMI_TAG) {
            return Err(InterchangeError::xml("Missing uml:Model or xmi:XMI root element"));
        }
        Ok(())
    }
}

/// A parsed XMI document.
#[derive(Clone, Debug, Default)]
pub struct XmiDocument {
    /// Synthetic node holding the document's top-level element(s) by tag.
    root: RawNode,
}

impl XmiDocument {
    /// The `uml:Model` element, either at the document root or inside `xmi:XMI`.
    pub fn model(&self) -> Result<&RawNode, InterchangeError> {
        self.root
            .child(MODEL_TAG)
            .or_else(|| self.root.child(XMI_TAG).and_then(|xmi| xmi.child(MODEL_TAG)))
            .ok_or_else(|| InterchangeError::missing_element(MODEL_TAG))
    }

    /// The model's packaged elements in document order.
    ///
    /// Members of nested `uml:Package` elements are spliced in place of
    /// their package.
    pub fn packaged_elements(&self) -> Result<Vec<&RawNode>, InterchangeError> {
        let mut out = Vec::new();
        let mut stack: Vec<std::slice::Iter<'_, RawNode>> =
            vec![self.model()?.children(PACKAGED_ELEMENT).iter()];

        while let Some(members) = stack.last_mut() {
            match members.next() {
                Some(member) if member.kind() == Some(PACKAGE_KIND) => {
                    stack.push(member.children(PACKAGED_ELEMENT).iter());
                }
                Some(member) => out.push(member),
                None => {
                    stack.pop();
                }
            }
        }
        Ok(out)
    }
}

/// XMI document reader.
struct XmiReader {
    /// Open elements, innermost last.
    open: Vec<(String, RawNode)>,
    document: RawNode,
}

impl XmiReader {
    fn new() -> Self {
        Self {
            open: Vec::new(),
            document: RawNode::new(),
        }
    }

    fn read(mut self, input: &[u8]) -> Result<XmiDocument, InterchangeError> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let (tag, node) = start_element(e)?;
                    self.open.push((tag, node));
                }
                Ok(Event::Empty(ref e)) => {
                    // Self-closing element - attach immediately
                    let (tag, node) = start_element(e)?;
                    self.attach(&tag, node);
                }
                Ok(Event::End(_)) => {
                    if let Some((tag, node)) = self.open.pop() {
                        self.attach(&tag, node);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(InterchangeError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if let Some((tag, _)) = self.open.last() {
            return Err(InterchangeError::xml(format!("Unclosed element <{tag}>")));
        }

        tracing::trace!(
            "[XMI] Read document with {} top-level element(s)",
            self.document.child_nodes().count()
        );
        Ok(XmiDocument {
            root: self.document,
        })
    }

    fn attach(&mut self, tag: &str, node: RawNode) {
        match self.open.last_mut() {
            Some((_, parent)) => parent.push_child(tag, node),
            None => self.document.push_child(tag, node),
        }
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<(String, RawNode), InterchangeError> {
    let name_bytes = e.name();
    let tag = std::str::from_utf8(name_bytes.as_ref())
        .map_err(|e| InterchangeError::xml(format!("Invalid tag name: {e}")))?
        .to_string();

    let mut node = RawNode::new();
    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| InterchangeError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| InterchangeError::xml(format!("Attribute key error: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| InterchangeError::xml(format!("Attribute value error: {e}")))?;
        node.set_attr(key, value.as_ref());
    }
    Ok((tag, node))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="20131001" xmlns:xmi="http://www.omg.org/spec/XMI/20131001" xmlns:uml="http://www.eclipse.org/uml2/5.0.0/UML">
  <uml:Model xmi:id="m1" name="shapes">
    <packagedElement xmi:type="uml:Class" xmi:id="c1" name="Shape"/>
    <packagedElement xmi:type="uml:Package" xmi:id="pk1" name="inner">
      <packagedElement xmi:type="uml:Class" xmi:id="c2" name="Circle"/>
      <packagedElement xmi:type="uml:Class" xmi:id="c3" name="Square"/>
    </packagedElement>
    <packagedElement xmi:type="uml:Enumeration" xmi:id="e1" name="Color">
      <ownedLiteral xmi:id="l1" name="RED"/>
    </packagedElement>
  </uml:Model>
</xmi:XMI>"#;

    #[test]
    fn test_reads_wrapped_model_and_flattens_packages() {
        let doc = Xmi.read(WRAPPED.as_bytes()).unwrap();
        let names: Vec<_> = doc
            .packaged_elements()
            .unwrap()
            .into_iter()
            .filter_map(RawNode::name)
            .collect();
        assert_eq!(names, vec!["Shape", "Circle", "Square", "Color"]);
    }

    #[test]
    fn test_single_child_and_attributes() {
        let doc = Xmi.read(WRAPPED.as_bytes()).unwrap();
        let elements = doc.packaged_elements().unwrap();
        let color = elements[3];
        assert_eq!(color.kind(), Some("uml:Enumeration"));
        assert_eq!(color.id(), Some("e1"));
        assert_eq!(color.children("ownedLiteral").len(), 1);
        assert_eq!(color.children("ownedLiteral")[0].name(), Some("RED"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let xml = r#"<uml:Model xmi:id="m"><packagedElement xmi:type="uml:Class" xmi:id="c" name="A&amp;B"/></uml:Model>"#;
        let doc = Xmi.read(xml.as_bytes()).unwrap();
        assert_eq!(doc.packaged_elements().unwrap()[0].name(), Some("A&B"));
    }

    #[test]
    fn test_missing_model_is_reported() {
        let doc = Xmi.read(b"<root/>").unwrap();
        assert!(matches!(
            doc.packaged_elements(),
            Err(InterchangeError::Missing { .. })
        ));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = Xmi.read(b"<uml:Model><packagedElement></uml:Model>");
        assert!(matches!(result, Err(InterchangeError::Xml(_))));
    }

    #[test]
    fn test_validate_rejects_foreign_documents() {
        assert!(Xmi.validate(WRAPPED.as_bytes()).is_ok());
        assert!(Xmi.validate(b"<html/>").is_err());
    }
}
