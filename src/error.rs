//! Errors raised while transforming a source model into a grammar.

use thiserror::Error;

use crate::interchange::InterchangeError;

/// Errors that abort a transformation.
///
/// There is no partial-success mode: the first error aborts the whole build
/// and names the offending element.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A raw node's discriminant does not match any supported UML kind.
    #[error("Unrecognized element kind '{kind}' ({context})")]
    UnrecognizedKind { kind: String, context: String },

    /// An identifier or name does not resolve.
    #[error("Dangling reference '{reference}' ({context})")]
    DanglingReference { reference: String, context: String },

    /// An association declares an unsupported number of navigable ends.
    #[error("Association '{association}' has {count} navigable owned end(s); expected 1 or 2")]
    InvalidAssociationArity { association: String, count: usize },

    /// A multiplicity bound is not a number or `*`.
    #[error("Invalid multiplicity '{value}' on '{element}'")]
    InvalidMultiplicity { element: String, value: String },

    /// Missing required element or attribute.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// Two grammar interfaces would share a name.
    #[error("Duplicate interface '{0}'")]
    DuplicateInterface(String),

    /// Reading the source document failed.
    #[error(transparent)]
    Interchange(#[from] InterchangeError),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TransformError {
    /// Create an unrecognized kind error.
    pub fn unrecognized(kind: Option<&str>, context: impl Into<String>) -> Self {
        Self::UnrecognizedKind {
            kind: kind.unwrap_or("<missing>").to_string(),
            context: context.into(),
        }
    }

    /// Create a dangling reference error.
    pub fn dangling(reference: impl Into<String>, context: impl Into<String>) -> Self {
        Self::DanglingReference {
            reference: reference.into(),
            context: context.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "attribute",
            name: name.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_element() {
        let err = TransformError::unrecognized(Some("uml:Actor"), "packaged element 'User'");
        assert_eq!(
            err.to_string(),
            "Unrecognized element kind 'uml:Actor' (packaged element 'User')"
        );

        let err = TransformError::dangling("_abc", "type of property 'owner'");
        assert!(err.to_string().contains("_abc"));

        let err = TransformError::InvalidAssociationArity {
            association: "A_state_transition".into(),
            count: 0,
        };
        assert!(err.to_string().contains("0 navigable"));
    }

    #[test]
    fn test_missing_kind_placeholder() {
        let err = TransformError::unrecognized(None, "root element #3");
        assert!(err.to_string().contains("<missing>"));
    }
}
