use std::sync::Arc;

/// Identifier of a source model element.
///
/// This corresponds to `xmi:id` in XMI documents. Also used for library
/// references (`href`) that have no local identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct XmiId(Arc<str>);

impl XmiId {
    /// Create a new identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for XmiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for XmiId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for XmiId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Arc<str>> for XmiId {
    fn from(s: Arc<str>) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for XmiId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
