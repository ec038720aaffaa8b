//! UML class-model metamodel and its construction from raw nodes.
//!
//! ```text
//! [&RawNode] ──▶ IdentifierIndex ──▶ UmlBuilder ──▶ UmlModel (arena)
//! ```
//!
//! Only the subset of UML needed for grammar generation is modelled:
//! classes (and interfaces), data types, primitive types, enumerations,
//! associations, generalizations and properties.

mod builder;
mod index;
mod model;


pub use builder::{UmlBuilder, kinds};
pub use index::IdentifierIndex;
pub use model::{ElementHandle, UmlModel};

use crate::base::{Name, XmiId};

// ============================================================================
// ENUMERATED ATTRIBUTES
// ============================================================================

/// UML visibility, passed through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    Package,
}

impl Visibility {
    /// Parse a visibility attribute; anything unrecognised is public.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("private") => Self::Private,
            Some("protected") => Self::Protected,
            Some("package") => Self::Package,
            _ => Self::Public,
        }
    }
}

/// How a property owns the value it refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    #[default]
    None,
    Shared,
    Composite,
}

impl AggregationKind {
    /// Parse an aggregation attribute; missing or unknown values mean none.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("composite") => Self::Composite,
            Some("shared") => Self::Shared,
            _ => Self::None,
        }
    }
}

/// Multiplicity bounds of a property.
///
/// Upper bounds above one are not distinguished from each other and are
/// stored as [`Multiplicity::MANY`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    pub lower: u32,
    pub upper: u32,
}

impl Multiplicity {
    /// Sentinel upper bound meaning "more than one".
    pub const MANY: u32 = 2;
    /// Exactly one, the default when no bounds are given.
    pub const ONE: Self = Self { lower: 1, upper: 1 };

    pub fn new(lower: u32, upper: u32) -> Self {
        Self {
            lower,
            upper: upper.min(Self::MANY),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.lower == 0
    }

    pub fn is_many(&self) -> bool {
        self.upper > 1
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::ONE
    }
}

// ============================================================================
// OWNED MEMBERS
// ============================================================================

/// A typed, multiplicity-bounded attribute or association end.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
    pub multiplicity: Multiplicity,
    pub aggregation: AggregationKind,
    /// The property's type; always a Class, DataType, PrimitiveType or Enumeration.
    pub ty: ElementHandle,
    /// The association owning this property, for association ends.
    pub association: Option<ElementHandle>,
}

/// Specialisation of a class by one or more parent classes.
#[derive(Clone, Debug, PartialEq)]
pub struct Generalization {
    pub id: Option<XmiId>,
    pub target: Vec<ElementHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumerationLiteral {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
}

// ============================================================================
// ELEMENTS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Class {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
    /// Converted from `uml:Interface` rather than `uml:Class`.
    pub is_interface: bool,
    pub attributes: Vec<Property>,
    pub generalizations: Vec<Generalization>,
}

/// A data type. Only name and visibility carry information; the structural
/// members are always empty.
#[derive(Clone, Debug, PartialEq)]
pub struct DataType {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
    pub attributes: Vec<Property>,
    pub generalizations: Vec<Generalization>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveType {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enumeration {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
    /// Literals in declaration order.
    pub literals: Vec<EnumerationLiteral>,
    pub attributes: Vec<Property>,
    pub generalizations: Vec<Generalization>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Association {
    pub id: Option<XmiId>,
    pub name: Name,
    pub visibility: Visibility,
    pub owned_ends: [Property; 2],
    /// Tokens of `navigableOwnedEnd`, naming the traversable ends.
    pub navigable_owned_ends: Vec<Name>,
}

impl Association {
    /// Index into `owned_ends` of the end named by a navigable token.
    ///
    /// Tokens are end identifiers in XMI; end names are accepted as well.
    pub fn end_index(&self, token: &str) -> Option<usize> {
        self.owned_ends.iter().position(|end| {
            end.id.as_ref().is_some_and(|id| id.as_str() == token) || end.name.as_str() == token
        })
    }
}

/// A UML model element.
#[derive(Clone, Debug, PartialEq)]
pub enum UmlElement {
    Class(Class),
    DataType(DataType),
    PrimitiveType(PrimitiveType),
    Enumeration(Enumeration),
    Association(Association),
}

impl UmlElement {
    pub fn name(&self) -> &Name {
        match self {
            Self::Class(c) => &c.name,
            Self::DataType(d) => &d.name,
            Self::PrimitiveType(p) => &p.name,
            Self::Enumeration(e) => &e.name,
            Self::Association(a) => &a.name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Self::Class(c) => c.visibility,
            Self::DataType(d) => d.visibility,
            Self::PrimitiveType(p) => p.visibility,
            Self::Enumeration(e) => e.visibility,
            Self::Association(a) => a.visibility,
        }
    }

    pub fn id(&self) -> Option<&XmiId> {
        match self {
            Self::Class(c) => c.id.as_ref(),
            Self::DataType(d) => d.id.as_ref(),
            Self::PrimitiveType(p) => p.id.as_ref(),
            Self::Enumeration(e) => e.id.as_ref(),
            Self::Association(a) => a.id.as_ref(),
        }
    }

    /// Metaclass name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Class(c) if c.is_interface => "Interface",
            Self::Class(_) => "Class",
            Self::DataType(_) => "DataType",
            Self::PrimitiveType(_) => "PrimitiveType",
            Self::Enumeration(_) => "Enumeration",
            Self::Association(_) => "Association",
        }
    }

    /// DataType, PrimitiveType or Enumeration: emitted inline, never referenced.
    pub fn is_data_type(&self) -> bool {
        matches!(
            self,
            Self::DataType(_) | Self::PrimitiveType(_) | Self::Enumeration(_)
        )
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&Enumeration> {
        match self {
            Self::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_association(&self) -> Option<&Association> {
        match self {
            Self::Association(a) => Some(a),
            _ => None,
        }
    }
}
