//! Identifier index over a raw tree.

use rustc_hash::FxHashMap;

use crate::TransformError;
use crate::interchange::RawNode;

/// Map from element identifier to the raw node carrying it.
///
/// Built once before model building; read-only afterwards.
#[derive(Debug, Default)]
pub struct IdentifierIndex<'a> {
    nodes: FxHashMap<&'a str, &'a RawNode>,
}

impl<'a> IdentifierIndex<'a> {
    /// Index every node reachable from `roots`, nested ones included.
    ///
    /// If two nodes share an identifier the last one visited wins.
    pub fn build<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = &'a RawNode>,
    {
        let mut nodes = FxHashMap::default();
        let mut stack: Vec<&'a RawNode> = roots.into_iter().collect();
        stack.reverse();

        while let Some(node) = stack.pop() {
            if let Some(id) = node.id() {
                if nodes.insert(id, node).is_some() {
                    tracing::warn!("[INDEX] Duplicate identifier '{id}'; keeping the last node");
                }
            }
            let first = stack.len();
            stack.extend(node.child_nodes());
            stack[first..].reverse();
        }

        tracing::debug!("[INDEX] Indexed {} identified node(s)", nodes.len());
        Self { nodes }
    }

    pub fn get(&self, id: &str) -> Option<&'a RawNode> {
        self.nodes.get(id).copied()
    }

    /// Look up an identifier, failing with a dangling reference error.
    pub fn resolve(
        &self,
        id: &str,
        context: impl FnOnce() -> String,
    ) -> Result<&'a RawNode, TransformError> {
        self.get(id)
            .ok_or_else(|| TransformError::dangling(id, context()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
