//! Second pass: resolving named type references.
//!
//! The builder leaves every reference to another grammar type as an
//! unresolved [`TypeRef`] and records where it put it. Once every interface
//! and union exists, [`link`] walks those records and resolves each cell
//! against the grammar's name tables. Nothing outside this module can
//! resolve a cell.

use super::{Grammar, InterfaceId, UnionId};
use crate::TransformError;
use crate::base::Name;

/// What a resolved reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTarget {
    Interface(InterfaceId),
    Union(UnionId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Unresolved,
    Resolved(TypeTarget),
}

/// A reference to a grammar type by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    name: Name,
    cell: Cell,
}

impl TypeRef {
    pub fn unresolved(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            cell: Cell::Unresolved,
        }
    }

    /// The referenced name, as written in the source model.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The resolved target, once linked.
    pub fn target(&self) -> Option<TypeTarget> {
        match self.cell {
            Cell::Unresolved => None,
            Cell::Resolved(target) => Some(target),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.cell, Cell::Resolved(_))
    }

    fn resolve(&mut self, target: TypeTarget) {
        self.cell = Cell::Resolved(target);
    }
}

/// Where an unresolved [`TypeRef`] was placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefSlot {
    /// Inside the type of the interface's attribute at this position.
    Attribute(usize),
    /// The interface's super type at this position.
    SuperType(usize),
}

/// A reference cell waiting for the linking pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingReference {
    pub owner: InterfaceId,
    pub slot: RefSlot,
}

/// Resolve every pending reference in place.
///
/// Attribute types resolve against interfaces first, then unions. Super
/// types resolve against interfaces only. The first name that does not
/// resolve aborts linking with [`TransformError::DanglingReference`].
pub fn link(grammar: &mut Grammar, pending: &[PendingReference]) -> Result<(), TransformError> {
    for reference in pending {
        let owner_name = grammar.interface(reference.owner).name.clone();

        let (name, target) = match reference.slot {
            RefSlot::Attribute(index) => {
                let name = attribute_ref(grammar, reference.owner, index)?.name().clone();
                let target = grammar
                    .find_interface(&name)
                    .map(TypeTarget::Interface)
                    .or_else(|| grammar.find_union(&name).map(TypeTarget::Union));
                (name, target)
            }
            RefSlot::SuperType(index) => {
                let name = super_type_ref(grammar, reference.owner, index)?.name().clone();
                let target = grammar.find_interface(&name).map(TypeTarget::Interface);
                (name, target)
            }
        };

        let Some(target) = target else {
            let context = match reference.slot {
                RefSlot::Attribute(index) => {
                    let attribute = &grammar.interface(reference.owner).attributes[index];
                    format!("type of attribute '{}' of interface '{owner_name}'", attribute.name)
                }
                RefSlot::SuperType(_) => format!("super type of interface '{owner_name}'"),
            };
            return Err(TransformError::dangling(name.as_str(), context));
        };

        let cell = match reference.slot {
            RefSlot::Attribute(index) => attribute_ref(grammar, reference.owner, index)?,
            RefSlot::SuperType(index) => super_type_ref(grammar, reference.owner, index)?,
        };
        cell.resolve(target);
        tracing::trace!("[LINK] {owner_name}: '{name}' -> {target:?}");
    }

    tracing::debug!("[LINK] Resolved {} reference(s)", pending.len());
    Ok(())
}

fn attribute_ref(
    grammar: &mut Grammar,
    owner: InterfaceId,
    index: usize,
) -> Result<&mut TypeRef, TransformError> {
    grammar
        .interface_mut(owner)
        .attributes
        .get_mut(index)
        .and_then(|attribute| attribute.ty.type_ref_mut())
        .ok_or_else(|| stale_slot(owner, "attribute", index))
}

fn super_type_ref(
    grammar: &mut Grammar,
    owner: InterfaceId,
    index: usize,
) -> Result<&mut TypeRef, TransformError> {
    grammar
        .interface_mut(owner)
        .super_types
        .get_mut(index)
        .ok_or_else(|| stale_slot(owner, "super type", index))
}

fn stale_slot(owner: InterfaceId, what: &'static str, index: usize) -> TransformError {
    TransformError::Missing {
        kind: "element",
        name: format!("named {what} #{index} of interface {}", owner.index()),
    }
}
