//! Grammar metamodel and the UML → grammar transformation.
//!
//! ```text
//! UmlModel ──▶ GrammarBuilder ──▶ (Grammar, [PendingReference]) ──▶ link ──▶ Grammar
//!                                                                            │
//!                                                                  render ◀──┘
//! ```
//!
//! A [`Grammar`] holds typed [`Interface`]s (from classes and non-primitive
//! data types), [`UnionType`]s (from enumerations) and the primitive kinds
//! its attributes use. References between types are [`TypeRef`] cells,
//! filled in by [`link`] once every type exists.

mod builder;
mod link;
mod primitive;
mod render;


pub use builder::GrammarBuilder;
pub use link::{PendingReference, RefSlot, TypeRef, TypeTarget, link};
pub use primitive::{PrimitiveKind, convert_primitive, dedupe, terminal_for, terminal_for_name};
pub use render::{render, type_string};

use indexmap::IndexMap;

use crate::base::Name;

// ============================================================================
// HANDLES
// ============================================================================

/// Handle to an [`Interface`] in a [`Grammar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(u32);

impl InterfaceId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Handle to a [`UnionType`] in a [`Grammar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnionId(u32);

impl UnionId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// TYPE EXPRESSIONS
// ============================================================================

/// A single named or primitive type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleType {
    Primitive(PrimitiveKind),
    Named(TypeRef),
}

/// The type of an attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDefinition {
    Simple(SimpleType),
    /// Many-valued; the element type never is an array itself.
    Array(Box<TypeDefinition>),
    /// Cross-reference to another type rather than a contained value.
    Reference(SimpleType),
}

impl TypeDefinition {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Simple(SimpleType::Primitive(kind))
    }

    pub fn named(name: impl Into<Name>) -> Self {
        Self::Simple(SimpleType::Named(TypeRef::unresolved(name)))
    }

    pub fn reference(name: impl Into<Name>) -> Self {
        Self::Reference(SimpleType::Named(TypeRef::unresolved(name)))
    }

    pub fn array(element: TypeDefinition) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_reference(&self) -> bool {
        match self {
            Self::Reference(_) => true,
            Self::Array(element) => element.is_reference(),
            Self::Simple(_) => false,
        }
    }

    /// The innermost simple type.
    pub fn simple(&self) -> &SimpleType {
        match self {
            Self::Simple(simple) | Self::Reference(simple) => simple,
            Self::Array(element) => element.simple(),
        }
    }

    /// The named reference inside this type, if it has one.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self.simple() {
            SimpleType::Named(type_ref) => Some(type_ref),
            SimpleType::Primitive(_) => None,
        }
    }

    /// The primitive kind inside this type, if it has one.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.simple() {
            SimpleType::Primitive(kind) => Some(*kind),
            SimpleType::Named(_) => None,
        }
    }

    fn type_ref_mut(&mut self) -> Option<&mut TypeRef> {
        let simple = match self {
            Self::Simple(simple) | Self::Reference(simple) => simple,
            Self::Array(element) => return element.type_ref_mut(),
        };
        match simple {
            SimpleType::Named(type_ref) => Some(type_ref),
            SimpleType::Primitive(_) => None,
        }
    }
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// A named, typed attribute of an interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeAttribute {
    pub name: Name,
    pub is_optional: bool,
    pub ty: TypeDefinition,
}

/// A grammar interface, produced from a class or a data type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    pub name: Name,
    /// Attributes in insertion order: owned properties first, then
    /// association ends.
    pub attributes: Vec<TypeAttribute>,
    pub super_types: Vec<TypeRef>,
}

impl Interface {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            super_types: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&TypeAttribute> {
        self.attributes.iter().find(|attr| attr.name.as_str() == name)
    }
}

/// An enumeration rendered as a union of string literals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionType {
    pub name: Name,
    /// Literal names, unquoted, in declaration order.
    pub literals: Vec<Name>,
}

impl UnionType {
    /// The union's name followed by each literal in single quotes.
    pub fn entries(&self) -> Vec<String> {
        std::iter::once(self.name.to_string())
            .chain(self.literals.iter().map(|literal| format!("'{literal}'")))
            .collect()
    }
}

/// A top-level grammar declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrammarElement<'g> {
    Interface(&'g Interface),
    Union(&'g UnionType),
}

impl<'g> GrammarElement<'g> {
    pub fn name(&self) -> &'g Name {
        match self {
            Self::Interface(interface) => &interface.name,
            Self::Union(union) => &union.name,
        }
    }
}

// ============================================================================
// GRAMMAR
// ============================================================================

/// A grammar model.
///
/// Interface and union names are unique; the name tables double as the
/// symbol tables used by [`link`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grammar {
    pub name: Name,
    pub entry_rule: Name,
    interfaces: Vec<Interface>,
    interface_names: IndexMap<Name, InterfaceId>,
    unions: Vec<UnionType>,
    union_names: IndexMap<Name, UnionId>,
    primitive_types: Vec<PrimitiveKind>,
}

impl Grammar {
    pub fn new(name: impl Into<Name>, entry_rule: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            entry_rule: entry_rule.into(),
            ..Self::default()
        }
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.interfaces[id.index()]
    }

    fn interface_mut(&mut self, id: InterfaceId) -> &mut Interface {
        &mut self.interfaces[id.index()]
    }

    pub fn find_interface(&self, name: &str) -> Option<InterfaceId> {
        self.interface_names.get(name).copied()
    }

    pub fn interface_named(&self, name: &str) -> Option<&Interface> {
        self.find_interface(name).map(|id| self.interface(id))
    }

    pub fn unions(&self) -> &[UnionType] {
        &self.unions
    }

    pub fn union(&self, id: UnionId) -> &UnionType {
        &self.unions[id.index()]
    }

    pub fn find_union(&self, name: &str) -> Option<UnionId> {
        self.union_names.get(name).copied()
    }

    /// Every declaration: interfaces in creation order, then unions.
    pub fn elements(&self) -> impl Iterator<Item = GrammarElement<'_>> {
        self.interfaces
            .iter()
            .map(GrammarElement::Interface)
            .chain(self.unions.iter().map(GrammarElement::Union))
    }

    /// Primitive kinds used by attributes.
    pub fn primitive_types(&self) -> &[PrimitiveKind] {
        &self.primitive_types
    }

    /// Name of the type a resolved reference points at.
    pub fn target_name(&self, target: TypeTarget) -> &Name {
        match target {
            TypeTarget::Interface(id) => &self.interface(id).name,
            TypeTarget::Union(id) => &self.union(id).name,
        }
    }

    /// Whether every named reference has been linked.
    pub fn is_linked(&self) -> bool {
        self.interfaces.iter().all(|interface| {
            interface.super_types.iter().all(TypeRef::is_resolved)
                && interface
                    .attributes
                    .iter()
                    .all(|attr| attr.ty.type_ref().is_none_or(TypeRef::is_resolved))
        })
    }

    /// Replace the primitive list by its first-seen-order deduplication.
    pub fn dedupe_primitives(&mut self) {
        self.primitive_types = dedupe(&self.primitive_types);
    }

    /// Whether `name` is taken by an interface or a union.
    fn has_type(&self, name: &str) -> bool {
        self.interface_names.contains_key(name) || self.union_names.contains_key(name)
    }

    fn add_interface(&mut self, interface: Interface) -> InterfaceId {
        let id = InterfaceId(self.interfaces.len() as u32);
        self.interface_names.insert(interface.name.clone(), id);
        self.interfaces.push(interface);
        id
    }

    fn add_union(&mut self, union: UnionType) -> UnionId {
        let id = UnionId(self.unions.len() as u32);
        self.union_names.insert(union.name.clone(), id);
        self.unions.push(union);
        id
    }

    fn use_primitive(&mut self, kind: PrimitiveKind) {
        self.primitive_types.push(kind);
    }
}
