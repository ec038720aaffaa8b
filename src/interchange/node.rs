//! Generic attributed tree produced from a source document.
//!
//! A [`RawNode`] is an ordered map from keys to [`RawValue`]s. XML attributes
//! are stored under an `@_` prefix (`@_xmi:id`, `@_name`, ...), child elements
//! under their tag name. A tag that occurs more than once under the same
//! parent becomes a [`RawValue::List`]; a tag that occurs once stays a single
//! [`RawValue::Node`]. Consumers read both shapes through [`RawNode::children`].

use indexmap::IndexMap;
use indexmap::map::Entry;
use std::sync::Arc;

/// Key prefix marking an attribute entry.
pub const ATTR_PREFIX: &str = "@_";
/// Attribute carrying the element identifier.
pub const ID_ATTR: &str = "xmi:id";
/// Attribute carrying the element kind discriminant.
pub const KIND_ATTR: &str = "xmi:type";

/// A value stored under a [`RawNode`] key.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// Attribute value.
    Scalar(Arc<str>),
    /// A child element that occurred once.
    Node(RawNode),
    /// Child elements sharing a tag, in document order.
    List(Vec<RawNode>),
}

impl RawValue {
    /// The nodes held by this value; empty for scalars.
    pub fn nodes(&self) -> &[RawNode] {
        match self {
            RawValue::Scalar(_) => &[],
            RawValue::Node(node) => std::slice::from_ref(node),
            RawValue::List(nodes) => nodes,
        }
    }
}

/// An element of the source document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawNode {
    entries: IndexMap<Arc<str>, RawValue>,
}

impl RawNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RawNode::set_attr`].
    pub fn with_attr(mut self, name: &str, value: impl Into<Arc<str>>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`RawNode::push_child`].
    pub fn with_child(mut self, tag: &str, child: RawNode) -> Self {
        self.push_child(tag, child);
        self
    }

    /// Store `children` under `tag` as a list, even when there is only one.
    pub fn with_children(mut self, tag: &str, children: Vec<RawNode>) -> Self {
        self.entries.insert(Arc::from(tag), RawValue::List(children));
        self
    }

    /// Set an attribute. `name` is given without the `@_` prefix.
    pub fn set_attr(&mut self, name: &str, value: impl Into<Arc<str>>) {
        self.entries
            .insert(attr_key(name), RawValue::Scalar(value.into()));
    }

    /// Append a child element under `tag`, promoting a single child to a list.
    pub fn push_child(&mut self, tag: &str, child: RawNode) {
        match self.entries.entry(Arc::from(tag)) {
            Entry::Vacant(slot) => {
                slot.insert(RawValue::Node(child));
            }
            Entry::Occupied(mut slot) => {
                let value = slot.get_mut();
                *value = match std::mem::replace(value, RawValue::List(Vec::new())) {
                    RawValue::Node(first) => RawValue::List(vec![first, child]),
                    RawValue::List(mut nodes) => {
                        nodes.push(child);
                        RawValue::List(nodes)
                    }
                    RawValue::Scalar(_) => RawValue::Node(child),
                };
            }
        }
    }

    /// Look up an attribute by its unprefixed name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self.entries.get(attr_key(name).as_ref())? {
            RawValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The element identifier (`xmi:id`), if any.
    pub fn id(&self) -> Option<&str> {
        self.attr(ID_ATTR)
    }

    /// The element kind discriminant (`xmi:type`), if any.
    pub fn kind(&self) -> Option<&str> {
        self.attr(KIND_ATTR)
    }

    /// The `name` attribute, if any.
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// Whether at least one child element is stored under `tag`.
    pub fn has_child(&self, tag: &str) -> bool {
        !self.children(tag).is_empty()
    }

    /// The first child element under `tag`.
    pub fn child(&self, tag: &str) -> Option<&RawNode> {
        self.children(tag).first()
    }

    /// All child elements under `tag`, whether stored singly or as a list.
    pub fn children(&self, tag: &str) -> &[RawNode] {
        self.entries.get(tag).map(RawValue::nodes).unwrap_or(&[])
    }

    /// Every direct child element, across all tags, in insertion order.
    pub fn child_nodes(&self) -> impl Iterator<Item = &RawNode> {
        self.entries.values().flat_map(RawValue::nodes)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(key, value)| (key.as_ref(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn attr_key(name: &str) -> Arc<str> {
    let mut key = String::with_capacity(ATTR_PREFIX.len() + name.len());
    key.push_str(ATTR_PREFIX);
    key.push_str(name);
    Arc::from(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_prefixed() {
        let node = RawNode::new()
            .with_attr("xmi:id", "c1")
            .with_attr("xmi:type", "uml:Class")
            .with_attr("name", "State");

        assert_eq!(node.id(), Some("c1"));
        assert_eq!(node.kind(), Some("uml:Class"));
        assert_eq!(node.name(), Some("State"));
        assert!(node.entries().any(|(key, _)| key == "@_name"));
        assert_eq!(node.attr("visibility"), None);
    }

    #[test]
    fn test_repeated_child_promotes_to_list() {
        let node = RawNode::new()
            .with_child("ownedAttribute", RawNode::new().with_attr("name", "a"))
            .with_child("ownedAttribute", RawNode::new().with_attr("name", "b"))
            .with_child("ownedAttribute", RawNode::new().with_attr("name", "c"));

        let names: Vec<_> = node
            .children("ownedAttribute")
            .iter()
            .filter_map(RawNode::name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(matches!(
            node.entries().next(),
            Some((_, RawValue::List(list))) if list.len() == 3
        ));
    }

    #[test]
    fn test_single_child_reads_like_list() {
        let node = RawNode::new().with_child("generalization", RawNode::new().with_attr("general", "g1"));

        assert_eq!(node.children("generalization").len(), 1);
        assert_eq!(node.child("generalization").and_then(|g| g.attr("general")), Some("g1"));
        assert!(node.children("ownedLiteral").is_empty());
        assert!(!node.has_child("ownedLiteral"));
    }

    #[test]
    fn test_child_nodes_skips_scalars() {
        let node = RawNode::new()
            .with_attr("name", "Root")
            .with_child("a", RawNode::new())
            .with_children("b", vec![RawNode::new(), RawNode::new()]);

        assert_eq!(node.child_nodes().count(), 3);
    }
}
