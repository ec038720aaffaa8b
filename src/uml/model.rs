//! Arena storage for a built UML model.

use indexmap::IndexMap;

use super::{Class, UmlElement};
use crate::base::XmiId;

/// Handle to an element in a [`UmlModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u32);

impl ElementHandle {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A UML model: every converted element, addressed by [`ElementHandle`].
///
/// ```text
/// UmlModel
/// ├── elements: Vec<UmlElement>               (arena, allocation order)
/// ├── roots: Vec<ElementHandle>               (top-level, source order)
/// └── by_id: IndexMap<XmiId, ElementHandle>   (one handle per identifier)
/// ```
///
/// Elements reachable only through property types (library primitive types,
/// classes nested in other elements) live in the arena but not in `roots`.
#[derive(Clone, Debug, Default)]
pub struct UmlModel {
    elements: Vec<UmlElement>,
    roots: Vec<ElementHandle>,
    by_id: IndexMap<XmiId, ElementHandle>,
}

impl UmlModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an element by handle.
    ///
    /// Handles are only minted by the model that owns the element.
    pub fn get(&self, handle: ElementHandle) -> &UmlElement {
        &self.elements[handle.index()]
    }

    pub(super) fn get_mut(&mut self, handle: ElementHandle) -> &mut UmlElement {
        &mut self.elements[handle.index()]
    }

    /// The class behind `handle`, if it is one.
    pub fn class(&self, handle: ElementHandle) -> Option<&Class> {
        self.get(handle).as_class()
    }

    /// Handle of the element converted from the given identifier.
    pub fn lookup(&self, id: &str) -> Option<ElementHandle> {
        self.by_id.get(id).copied()
    }

    /// Top-level elements in source order.
    pub fn roots(&self) -> &[ElementHandle] {
        &self.roots
    }

    /// Top-level elements with their handles, in source order.
    pub fn iter_roots(&self) -> impl Iterator<Item = (ElementHandle, &UmlElement)> {
        self.roots.iter().map(|&handle| (handle, self.get(handle)))
    }

    /// Every element in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementHandle, &UmlElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, element)| (ElementHandle(i as u32), element))
    }

    /// First element with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<(ElementHandle, &UmlElement)> {
        self.iter().find(|(_, element)| element.name().as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add an element, registering its identifier.
    pub(super) fn alloc(&mut self, element: UmlElement) -> ElementHandle {
        let handle = ElementHandle(self.elements.len() as u32);
        if let Some(id) = element.id() {
            self.by_id.insert(id.clone(), handle);
        }
        self.elements.push(element);
        handle
    }

    /// Register an element under a key other than its own identifier.
    pub(super) fn alias(&mut self, key: XmiId, handle: ElementHandle) {
        self.by_id.insert(key, handle);
    }

    pub(super) fn push_root(&mut self, handle: ElementHandle) {
        self.roots.push(handle);
    }
}
