//! Forward pass from a [`UmlModel`] to an unlinked [`Grammar`].
//!
//! Top-level elements are visited once, in source order:
//!
//! | UML element   | Grammar result                                     |
//! |---------------|----------------------------------------------------|
//! | Class         | `Interface` with attributes and super types        |
//! | DataType      | primitive kind if its name maps to one, else an    |
//! |               | attribute-less `Interface`                         |
//! | PrimitiveType | nothing (used inline by attributes)                |
//! | Enumeration   | `UnionType`                                        |
//! | Association   | attributes added to the participating interfaces   |
//!
//! Association ends are queued and added after every interface exists,
//! so an association may come before the classes it connects.

use rustc_hash::FxHashMap;

use super::link::{PendingReference, RefSlot};
use super::{
    Grammar, Interface, InterfaceId, SimpleType, TypeAttribute, TypeDefinition, TypeRef,
    UnionType, convert_primitive,
};
use crate::TransformError;
use crate::config::{AssociationArityPolicy, OptionalityPolicy, TransformConfig};
use crate::uml::{
    AggregationKind, Association, Class, ElementHandle, Enumeration, Property, UmlElement,
    UmlModel,
};

/// How a property came to be converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropertyRole {
    /// Owned attribute of a class; only unaggregated class types become references.
    Owned,
    /// Navigable association end; anything not composite becomes a reference,
    /// whatever its type.
    AssociationEnd,
}

/// An association end waiting to be added to an interface.
#[derive(Clone, Copy, Debug)]
struct EndInsertion {
    association: ElementHandle,
    /// Index into the association's owned ends of the inserted property.
    end: usize,
    /// Element whose interface receives the attribute.
    receiver: ElementHandle,
}

/// State threaded through the forward pass.
#[derive(Debug, Default)]
struct BuildContext {
    grammar: Grammar,
    /// Interface produced for each converted UML element.
    interfaces: FxHashMap<ElementHandle, InterfaceId>,
    pending: Vec<PendingReference>,
    insertions: Vec<EndInsertion>,
}

impl BuildContext {
    fn check_unique(&self, name: &str) -> Result<(), TransformError> {
        if self.grammar.has_type(name) {
            return Err(TransformError::DuplicateInterface(name.to_string()));
        }
        Ok(())
    }

    fn add_interface(&mut self, element: ElementHandle, interface: Interface) -> InterfaceId {
        let id = self.grammar.add_interface(interface);
        for index in 0..self.grammar.interface(id).super_types.len() {
            self.pending.push(PendingReference {
                owner: id,
                slot: RefSlot::SuperType(index),
            });
        }
        self.interfaces.insert(element, id);
        id
    }

    /// Append an attribute, recording its named reference and primitive usage.
    fn push_attribute(&mut self, owner: InterfaceId, attribute: TypeAttribute) {
        if let Some(kind) = attribute.ty.primitive_kind() {
            self.grammar.use_primitive(kind);
        }
        let has_ref = attribute.ty.type_ref().is_some();

        let attributes = &mut self.grammar.interface_mut(owner).attributes;
        let index = attributes.len();
        attributes.push(attribute);

        if has_ref {
            self.pending.push(PendingReference {
                owner,
                slot: RefSlot::Attribute(index),
            });
        }
    }
}

/// Builds a grammar from a UML model.
pub struct GrammarBuilder<'m> {
    model: &'m UmlModel,
    config: &'m TransformConfig,
    ctx: BuildContext,
}

impl<'m> GrammarBuilder<'m> {
    pub fn new(model: &'m UmlModel, config: &'m TransformConfig) -> Self {
        Self {
            model,
            config,
            ctx: BuildContext {
                grammar: Grammar::new(config.grammar_name.as_str(), config.entry_rule.as_str()),
                ..BuildContext::default()
            },
        }
    }

    /// Run the forward pass.
    ///
    /// Returns the grammar with its named references still unresolved,
    /// together with the references [`super::link`] has to resolve.
    pub fn build(mut self) -> Result<(Grammar, Vec<PendingReference>), TransformError> {
        let model = self.model;
        for (handle, element) in model.iter_roots() {
            match element {
                UmlElement::Class(class) => self.class(handle, class)?,
                UmlElement::DataType(data_type) => {
                    if let Some(kind) = convert_primitive(&data_type.name) {
                        tracing::trace!("[GRAMMAR] Data type '{}' is {kind}", data_type.name);
                    } else {
                        self.ctx.check_unique(&data_type.name)?;
                        self.ctx
                            .add_interface(handle, Interface::new(data_type.name.clone()));
                    }
                }
                UmlElement::PrimitiveType(primitive) => {
                    tracing::trace!("[GRAMMAR] Skipping primitive type '{}'", primitive.name);
                }
                UmlElement::Enumeration(enumeration) => self.enumeration(enumeration)?,
                UmlElement::Association(association) => self.association(handle, association)?,
            }
        }

        self.insert_association_ends()?;

        let BuildContext { grammar, pending, .. } = self.ctx;
        tracing::debug!(
            "[GRAMMAR] Built {} interface(s), {} union(s), {} pending reference(s)",
            grammar.interfaces().len(),
            grammar.unions().len(),
            pending.len()
        );
        Ok((grammar, pending))
    }

    fn class(&mut self, handle: ElementHandle, class: &Class) -> Result<(), TransformError> {
        self.ctx.check_unique(&class.name)?;

        let mut interface = Interface::new(class.name.clone());
        interface.super_types = class
            .generalizations
            .iter()
            .flat_map(|generalization| &generalization.target)
            .map(|&target| TypeRef::unresolved(self.model.get(target).name().clone()))
            .collect();

        let id = self.ctx.add_interface(handle, interface);
        for property in &class.attributes {
            let attribute = self.attribute(property, PropertyRole::Owned);
            self.ctx.push_attribute(id, attribute);
        }

        tracing::trace!(
            "[GRAMMAR] Interface '{}' ({} attribute(s))",
            class.name,
            class.attributes.len()
        );
        Ok(())
    }

    fn enumeration(&mut self, enumeration: &Enumeration) -> Result<(), TransformError> {
        self.ctx.check_unique(&enumeration.name)?;
        self.ctx.grammar.add_union(UnionType {
            name: enumeration.name.clone(),
            literals: enumeration
                .literals
                .iter()
                .map(|literal| literal.name.clone())
                .collect(),
        });
        tracing::trace!("[GRAMMAR] Union '{}'", enumeration.name);
        Ok(())
    }

    /// Queue attributes for the navigable ends of an association.
    ///
    /// A navigable end becomes an attribute of the class at the other end.
    fn association(
        &mut self,
        handle: ElementHandle,
        association: &Association,
    ) -> Result<(), TransformError> {
        let receiver_of = |end: usize| association.owned_ends[1 - end].ty;

        let ends: Vec<usize> = match association.navigable_owned_ends.as_slice() {
            [_, _] => vec![0, 1],
            [token] => {
                let end = association.end_index(token).unwrap_or_else(|| {
                    tracing::warn!(
                        "[GRAMMAR] Navigable end '{token}' of association {} matches no owned end; using the second",
                        describe(association)
                    );
                    1
                });
                vec![end]
            }
            tokens => match self.config.association_arity {
                AssociationArityPolicy::Strict => {
                    return Err(TransformError::InvalidAssociationArity {
                        association: describe(association),
                        count: tokens.len(),
                    });
                }
                AssociationArityPolicy::Lenient => {
                    tracing::warn!(
                        "[GRAMMAR] Skipping association {} with {} navigable end(s)",
                        describe(association),
                        tokens.len()
                    );
                    Vec::new()
                }
            },
        };

        self.ctx
            .insertions
            .extend(ends.into_iter().map(|end| EndInsertion {
                association: handle,
                end,
                receiver: receiver_of(end),
            }));
        Ok(())
    }

    fn insert_association_ends(&mut self) -> Result<(), TransformError> {
        let model = self.model;
        for insertion in std::mem::take(&mut self.ctx.insertions) {
            let Some(association) = model.get(insertion.association).as_association() else {
                continue;
            };
            let property = &association.owned_ends[insertion.end];

            let Some(&owner) = self.ctx.interfaces.get(&insertion.receiver) else {
                return Err(TransformError::dangling(
                    model.get(insertion.receiver).name().as_str(),
                    format!(
                        "owner of end '{}' of association {}",
                        property.name,
                        describe(association)
                    ),
                ));
            };

            let attribute = self.attribute(property, PropertyRole::AssociationEnd);
            tracing::trace!(
                "[GRAMMAR] Association {} adds '{}' to '{}'",
                describe(association),
                attribute.name,
                self.ctx.grammar.interface(owner).name
            );
            self.ctx.push_attribute(owner, attribute);
        }
        Ok(())
    }

    /// Convert a property with the type-selection rule.
    fn attribute(&self, property: &Property, role: PropertyRole) -> TypeAttribute {
        let target = self.model.get(property.ty);

        let as_reference = match role {
            PropertyRole::Owned => {
                property.aggregation == AggregationKind::None && !target.is_data_type()
            }
            PropertyRole::AssociationEnd => property.aggregation != AggregationKind::Composite,
        };

        let simple = simple_type(target);
        let element = if as_reference {
            TypeDefinition::Reference(simple)
        } else {
            TypeDefinition::Simple(simple)
        };
        let ty = if property.multiplicity.is_many() {
            TypeDefinition::array(element)
        } else {
            element
        };

        let is_optional = match self.config.composite_optionality {
            OptionalityPolicy::LowerBound => property.multiplicity.is_optional(),
            OptionalityPolicy::AlwaysRequired => {
                property.aggregation != AggregationKind::Composite
                    && property.multiplicity.is_optional()
            }
        };

        TypeAttribute {
            name: property.name.clone(),
            is_optional,
            ty,
        }
    }
}

/// Primitive kind for primitive-like types with a known name, else a named reference.
fn simple_type(target: &UmlElement) -> SimpleType {
    let name = target.name();
    match target {
        UmlElement::PrimitiveType(_) | UmlElement::DataType(_) => match convert_primitive(name) {
            Some(kind) => SimpleType::Primitive(kind),
            None => {
                if matches!(target, UmlElement::PrimitiveType(_)) {
                    tracing::warn!("[GRAMMAR] Unrecognized primitive type '{name}'");
                }
                SimpleType::Named(TypeRef::unresolved(name.clone()))
            }
        },
        UmlElement::Class(_) | UmlElement::Enumeration(_) | UmlElement::Association(_) => {
            SimpleType::Named(TypeRef::unresolved(name.clone()))
        }
    }
}

fn describe(association: &Association) -> String {
    match (association.name.as_str(), &association.id) {
        ("", Some(id)) => format!("({id})"),
        ("", None) => "<anonymous>".to_string(),
        (name, Some(id)) => format!("'{name}' ({id})"),
        (name, None) => format!("'{name}'"),
    }
}
