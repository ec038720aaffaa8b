//! Conversion of raw nodes into a typed [`UmlModel`].
//!
//! Every identified element is converted once. A class is allocated in the
//! arena the first time it is seen, whether as a top-level element, a
//! property type or a generalization target, and its body (attributes,
//! generalizations) is filled from a work queue afterwards. References to
//! a class that is already allocated just reuse its handle, so cyclic and
//! diamond-shaped generalization graphs need no recursion at all.

use std::collections::VecDeque;

use super::model::{ElementHandle, UmlModel};
use super::{
    AggregationKind, Association, Class, DataType, Enumeration, EnumerationLiteral,
    Generalization, IdentifierIndex, Multiplicity, PrimitiveType, Property, UmlElement,
    Visibility,
};
use crate::TransformError;
use crate::base::{Name, XmiId};
use crate::interchange::RawNode;

/// `xmi:type` discriminants understood by the builder.
pub mod kinds {
    pub const CLASS: &str = "uml:Class";
    pub const INTERFACE: &str = "uml:Interface";
    pub const DATA_TYPE: &str = "uml:DataType";
    pub const PRIMITIVE_TYPE: &str = "uml:PrimitiveType";
    pub const ENUMERATION: &str = "uml:Enumeration";
    pub const ASSOCIATION: &str = "uml:Association";
}

/// Upper-bound marker for "unbounded".
const UNLIMITED: &str = "*";

/// Builds a [`UmlModel`] from top-level raw nodes.
pub struct UmlBuilder<'i, 'a> {
    index: &'i IdentifierIndex<'a>,
    model: UmlModel,
    /// Allocated classes whose members are not converted yet.
    pending_bodies: VecDeque<(ElementHandle, &'a RawNode)>,
}

impl<'i, 'a> UmlBuilder<'i, 'a> {
    pub fn new(index: &'i IdentifierIndex<'a>) -> Self {
        Self {
            index,
            model: UmlModel::new(),
            pending_bodies: VecDeque::new(),
        }
    }

    /// Convert every top-level node, in order.
    pub fn build(
        roots: &[&'a RawNode],
        index: &'i IdentifierIndex<'a>,
    ) -> Result<UmlModel, TransformError> {
        let mut builder = Self::new(index);
        for (position, node) in roots.iter().enumerate() {
            let handle = builder.convert_root(node, position)?;
            builder.model.push_root(handle);
            builder.fill_pending_bodies()?;
        }

        tracing::debug!(
            "[UML] Built {} element(s), {} top-level",
            builder.model.len(),
            builder.model.roots().len()
        );
        Ok(builder.model)
    }

    fn convert_root(
        &mut self,
        node: &'a RawNode,
        position: usize,
    ) -> Result<ElementHandle, TransformError> {
        match node.kind() {
            Some(
                kinds::CLASS
                | kinds::INTERFACE
                | kinds::DATA_TYPE
                | kinds::PRIMITIVE_TYPE
                | kinds::ENUMERATION
                | kinds::ASSOCIATION,
            ) => self.element_for(node),
            other => Err(TransformError::unrecognized(
                other,
                format!("top-level element #{position} {}", describe(node)),
            )),
        }
    }

    /// Handle of the element for `node`, converting it on first sight.
    fn element_for(&mut self, node: &'a RawNode) -> Result<ElementHandle, TransformError> {
        if let Some(handle) = node.id().and_then(|id| self.model.lookup(id)) {
            return Ok(handle);
        }

        let id = node.id().map(XmiId::from);
        let visibility = Visibility::parse(node.attr("visibility"));

        let handle = match node.kind() {
            Some(kind @ (kinds::CLASS | kinds::INTERFACE)) => {
                let handle = self.model.alloc(UmlElement::Class(Class {
                    id,
                    name: required_name(node, "class")?,
                    visibility,
                    is_interface: kind == kinds::INTERFACE,
                    attributes: Vec::new(),
                    generalizations: Vec::new(),
                }));
                self.pending_bodies.push_back((handle, node));
                handle
            }
            Some(kinds::DATA_TYPE) => self.model.alloc(UmlElement::DataType(DataType {
                id,
                name: required_name(node, "data type")?,
                visibility,
                attributes: Vec::new(),
                generalizations: Vec::new(),
            })),
            Some(kinds::PRIMITIVE_TYPE) => {
                self.model.alloc(UmlElement::PrimitiveType(PrimitiveType {
                    id,
                    name: required_name(node, "primitive type")?,
                    visibility,
                }))
            }
            Some(kinds::ENUMERATION) => {
                let enumeration = self.enumeration(node, id, visibility)?;
                self.model.alloc(UmlElement::Enumeration(enumeration))
            }
            Some(kinds::ASSOCIATION) => self.association(node, id, visibility)?,
            other => return Err(TransformError::unrecognized(other, describe(node))),
        };

        tracing::trace!(
            "[UML] Converted {} '{}'",
            self.model.get(handle).kind_name(),
            self.model.get(handle).name()
        );
        Ok(handle)
    }

    /// Convert members of allocated classes until none are left.
    fn fill_pending_bodies(&mut self) -> Result<(), TransformError> {
        while let Some((handle, node)) = self.pending_bodies.pop_front() {
            let attributes = node
                .children("ownedAttribute")
                .iter()
                .map(|attr| self.property(attr))
                .collect::<Result<Vec<_>, _>>()?;

            let generalizations = node
                .children("generalization")
                .iter()
                .map(|generalization| self.generalization(generalization, node))
                .collect::<Result<Vec<_>, _>>()?;

            if let UmlElement::Class(class) = self.model.get_mut(handle) {
                class.attributes = attributes;
                class.generalizations = generalizations;
            }
        }
        Ok(())
    }

    fn enumeration(
        &self,
        node: &'a RawNode,
        id: Option<XmiId>,
        visibility: Visibility,
    ) -> Result<Enumeration, TransformError> {
        let literals = node
            .children("ownedLiteral")
            .iter()
            .map(|literal| {
                Ok(EnumerationLiteral {
                    id: literal.id().map(XmiId::from),
                    name: required_name(literal, "enumeration literal")?,
                    visibility: Visibility::parse(literal.attr("visibility")),
                })
            })
            .collect::<Result<Vec<_>, TransformError>>()?;

        Ok(Enumeration {
            id,
            name: required_name(node, "enumeration")?,
            visibility,
            literals,
            attributes: Vec::new(),
            generalizations: Vec::new(),
        })
    }

    fn association(
        &mut self,
        node: &'a RawNode,
        id: Option<XmiId>,
        visibility: Visibility,
    ) -> Result<ElementHandle, TransformError> {
        let name = Name::from(node.name().unwrap_or_default());
        let ends = node.children("ownedEnd");
        let [first, second] = ends else {
            return Err(TransformError::Missing {
                kind: "element",
                name: format!(
                    "two ownedEnd children on association {} (found {})",
                    describe(node),
                    ends.len()
                ),
            });
        };
        let owned_ends = [self.property(first)?, self.property(second)?];

        let navigable_owned_ends: Vec<Name> = node
            .attr("navigableOwnedEnd")
            .map(|tokens| tokens.split_whitespace().map(Name::from).collect())
            .unwrap_or_default();

        let handle = self.model.alloc(UmlElement::Association(Association {
            id,
            name,
            visibility,
            owned_ends,
            navigable_owned_ends,
        }));
        if let UmlElement::Association(association) = self.model.get_mut(handle) {
            for end in &mut association.owned_ends {
                end.association = Some(handle);
            }
        }
        Ok(handle)
    }

    fn generalization(
        &mut self,
        node: &'a RawNode,
        specific: &'a RawNode,
    ) -> Result<Generalization, TransformError> {
        let general_id = node.attr("general").ok_or_else(|| {
            TransformError::missing_attribute(format!(
                "general of generalization in {}",
                describe(specific)
            ))
        })?;
        let general = self.index.resolve(general_id, || {
            format!("generalization target of {}", describe(specific))
        })?;

        match general.kind() {
            Some(kinds::CLASS | kinds::INTERFACE) => Ok(Generalization {
                id: node.id().map(XmiId::from),
                target: vec![self.element_for(general)?],
            }),
            other => Err(TransformError::unrecognized(
                other,
                format!("generalization target {} of {}", describe(general), describe(specific)),
            )),
        }
    }

    fn property(&mut self, node: &'a RawNode) -> Result<Property, TransformError> {
        let ty = self.property_type(node)?;
        let name = match node.name() {
            Some(name) => Name::from(name),
            None => unnamed_end(self.model.get(ty).name()),
        };

        Ok(Property {
            id: node.id().map(XmiId::from),
            multiplicity: multiplicity(node, &name)?,
            name,
            visibility: Visibility::parse(node.attr("visibility")),
            aggregation: AggregationKind::parse(node.attr("aggregation")),
            ty,
            association: None,
        })
    }

    /// Resolve a property's type, given by identifier or by library `href`.
    fn property_type(&mut self, node: &'a RawNode) -> Result<ElementHandle, TransformError> {
        if let Some(type_id) = node.attr("type") {
            let target = self
                .index
                .resolve(type_id, || format!("type of property {}", describe(node)))?;
            return match target.kind() {
                Some(
                    kinds::CLASS
                    | kinds::INTERFACE
                    | kinds::DATA_TYPE
                    | kinds::PRIMITIVE_TYPE
                    | kinds::ENUMERATION,
                ) => self.element_for(target),
                other => Err(TransformError::unrecognized(
                    other,
                    format!("type {} of property {}", describe(target), describe(node)),
                )),
            };
        }

        let Some(type_ref) = node.child("type") else {
            return Err(TransformError::missing_attribute(format!(
                "type of property {}",
                describe(node)
            )));
        };
        let href = type_ref.attr("href").ok_or_else(|| {
            TransformError::missing_attribute(format!("href of type of property {}", describe(node)))
        })?;
        self.library_type(href, type_ref.kind(), node)
    }

    /// A type defined outside the document, e.g.
    /// `pathmap://UML_LIBRARIES/UMLPrimitiveTypes.library.uml#String`.
    fn library_type(
        &mut self,
        href: &str,
        kind: Option<&str>,
        owner: &RawNode,
    ) -> Result<ElementHandle, TransformError> {
        if let Some(handle) = self.model.lookup(href) {
            return Ok(handle);
        }

        let name = Name::from(href.rsplit('#').next().unwrap_or(href));
        let visibility = Visibility::Public;
        let element = match kind {
            Some(kinds::PRIMITIVE_TYPE) => UmlElement::PrimitiveType(PrimitiveType {
                id: None,
                name,
                visibility,
            }),
            Some(kinds::DATA_TYPE) => UmlElement::DataType(DataType {
                id: None,
                name,
                visibility,
                attributes: Vec::new(),
                generalizations: Vec::new(),
            }),
            Some(kinds::ENUMERATION) => UmlElement::Enumeration(Enumeration {
                id: None,
                name,
                visibility,
                literals: Vec::new(),
                attributes: Vec::new(),
                generalizations: Vec::new(),
            }),
            Some(kind @ (kinds::CLASS | kinds::INTERFACE)) => UmlElement::Class(Class {
                id: None,
                name,
                visibility,
                is_interface: kind == kinds::INTERFACE,
                attributes: Vec::new(),
                generalizations: Vec::new(),
            }),
            other => {
                return Err(TransformError::unrecognized(
                    other,
                    format!("library type '{href}' of property {}", describe(owner)),
                ));
            }
        };

        let handle = self.model.alloc(element);
        self.model.alias(XmiId::from(href), handle);
        Ok(handle)
    }
}

fn required_name(node: &RawNode, what: &str) -> Result<Name, TransformError> {
    node.name().map(Name::from).ok_or_else(|| {
        TransformError::missing_attribute(format!("name of {what} {}", describe(node)))
    })
}

/// Default name of an unnamed association end: its type name, lower camel case.
fn unnamed_end(type_name: &str) -> Name {
    let mut chars = type_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>().into(),
        None => Name::default(),
    }
}

/// Read `lowerValue`/`upperValue` children.
///
/// A missing bound means 1. A `lowerValue` without a value is the literal
/// default 0. Upper bounds of `*` or above one collapse to [`Multiplicity::MANY`].
fn multiplicity(node: &RawNode, name: &str) -> Result<Multiplicity, TransformError> {
    let invalid = |value: &str| TransformError::InvalidMultiplicity {
        element: name.to_string(),
        value: value.to_string(),
    };

    let lower = match node.child("lowerValue") {
        None => 1,
        Some(bound) => match bound.attr("value") {
            None => 0,
            Some(value) => value.trim().parse::<u32>().map_err(|_| invalid(value))?,
        },
    };

    let upper = match node.child("upperValue") {
        None => 1,
        Some(bound) => match bound.attr("value").map(str::trim) {
            None => 1,
            Some(UNLIMITED | "-1") => Multiplicity::MANY,
            Some(value) => value.parse::<u32>().map_err(|_| invalid(value))?,
        },
    };

    Ok(Multiplicity::new(lower, upper))
}

/// `'name' (id)` for diagnostics.
fn describe(node: &RawNode) -> String {
    match (node.name(), node.id()) {
        (Some(name), Some(id)) => format!("'{name}' ({id})"),
        (Some(name), None) => format!("'{name}'"),
        (None, Some(id)) => format!("({id})"),
        (None, None) => "<anonymous>".to_string(),
    }
}
