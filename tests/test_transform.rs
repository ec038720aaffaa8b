//! Transformation of raw UML models through the public API.

mod helpers;

use rstest::rstest;

use helpers::*;
use uml2grammar::grammar::{
    PrimitiveKind, TypeTarget, convert_primitive, dedupe, terminal_for, terminal_for_name,
    type_string,
};
use uml2grammar::{AssociationArityPolicy, TransformConfig, TransformError, transform};

fn default_config() -> TransformConfig {
    TransformConfig::default()
}

#[test]
fn test_state_transition_bidirectional() {
    let grammar = transform(&state_transition(Some("a1_transition a1_state")), &default_config()).unwrap();

    let state = grammar.interface_named("State").unwrap();
    let attributes: Vec<_> = state
        .attributes
        .iter()
        .map(|attr| (attr.name.as_str(), type_string(&attr.ty)))
        .collect();
    assert_eq!(
        attributes,
        vec![("name", "string".to_string()), ("transition", "Transition".to_string())]
    );
    assert!(state.attributes[1].ty.is_reference());

    let transition = grammar.interface_named("Transition").unwrap();
    assert_eq!(transition.attributes.len(), 1);
    let state_ref = transition.attributes[0].ty.type_ref().unwrap();
    assert_eq!(state_ref.name(), "State");
    assert_eq!(
        state_ref.target(),
        Some(TypeTarget::Interface(grammar.find_interface("State").unwrap()))
    );
    assert!(grammar.is_linked());
}

#[rstest]
#[case("a1_transition", 2, 0)]
#[case("a1_state", 1, 1)]
fn test_one_navigable_end_adds_one_attribute(
    #[case] navigable: &str,
    #[case] state_attributes: usize,
    #[case] transition_attributes: usize,
) {
    let grammar = transform(&state_transition(Some(navigable)), &default_config()).unwrap();
    assert_eq!(grammar.interface_named("State").unwrap().attributes.len(), state_attributes);
    assert_eq!(
        grammar.interface_named("Transition").unwrap().attributes.len(),
        transition_attributes
    );
}

#[test]
fn test_no_navigable_end_is_an_arity_error() {
    let err = transform(&state_transition(None), &default_config()).unwrap_err();
    assert!(matches!(err, TransformError::InvalidAssociationArity { count: 0, .. }));
    assert!(err.to_string().contains("a1"));
}

#[test]
fn test_lenient_arity_keeps_going() {
    let config = default_config().with_association_arity(AssociationArityPolicy::Lenient);
    let grammar = transform(&state_transition(None), &config).unwrap();
    assert_eq!(grammar.interfaces().len(), 2);
}

#[test]
fn test_super_type_resolution() {
    let nodes = vec![
        class("base", "Vertex"),
        class("state", "State").with_child("generalization", generalization("g1", "base")),
        class("pseudo", "Pseudostate")
            .with_child("generalization", generalization("g2", "base"))
            .with_child("generalization", generalization("g3", "state")),
    ];
    let grammar = transform(&nodes, &default_config()).unwrap();

    assert!(grammar.interface_named("Vertex").unwrap().super_types.is_empty());
    let pseudo = grammar.interface_named("Pseudostate").unwrap();
    let targets: Vec<_> = pseudo
        .super_types
        .iter()
        .map(|super_type| grammar.target_name(super_type.target().unwrap()).as_str())
        .collect();
    assert_eq!(targets, vec!["Vertex", "State"]);
}

#[test]
fn test_cyclic_generalization_terminates() {
    let nodes = vec![
        class("a", "A").with_child("generalization", generalization("g1", "b")),
        class("b", "B").with_child("generalization", generalization("g2", "a")),
    ];
    let grammar = transform(&nodes, &default_config()).unwrap();
    assert_eq!(grammar.interfaces().len(), 2);
    assert!(grammar.is_linked());
}

#[test]
fn test_enumeration_entries() {
    let nodes = vec![enumeration("color", "Color", &["RED", "GREEN"])];
    let grammar = transform(&nodes, &default_config()).unwrap();
    let color = grammar.union(grammar.find_union("Color").unwrap());
    assert_eq!(color.entries(), vec!["Color", "'RED'", "'GREEN'"]);
}

#[test]
fn test_unrecognized_kind_aborts() {
    let nodes = vec![class("c1", "State"), element("uml:Component", "x", "Engine")];
    match transform(&nodes, &default_config()) {
        Err(TransformError::UnrecognizedKind { kind, context }) => {
            assert_eq!(kind, "uml:Component");
            assert!(context.contains("Engine"));
        }
        other => panic!("expected unrecognized kind, got {other:?}"),
    }
}

#[test]
fn test_dangling_identifier_aborts() {
    let nodes = vec![class("c1", "State").with_child("ownedAttribute", property("p", "next", "nowhere"))];
    let err = transform(&nodes, &default_config()).unwrap_err();
    assert!(matches!(err, TransformError::DanglingReference { ref reference, .. } if reference == "nowhere"));
}

// =============================================================================
// Primitive table
// =============================================================================

#[rstest]
#[case("string", "string")]
#[case("STR", "string")]
#[case("boolean", "boolean")]
#[case("Bool", "boolean")]
#[case("float", "number")]
#[case("double", "number")]
#[case("integer", "bigint")]
#[case("int", "bigint")]
#[case("Date", "Date")]
fn test_primitive_mapping(#[case] uml_name: &str, #[case] grammar_name: &str) {
    assert_eq!(convert_primitive(uml_name).map(|kind| kind.as_str()), Some(grammar_name));
}

#[rstest]
#[case("char")]
#[case("long")]
#[case("UnlimitedNatural")]
fn test_unknown_primitive_is_not_an_error(#[case] uml_name: &str) {
    assert_eq!(convert_primitive(uml_name), None);
}

#[test]
fn test_terminal_table() {
    assert_eq!(
        terminal_for(PrimitiveKind::Boolean),
        r"terminal BOOLEAN: /\b(?:true|false)\b/;"
    );
    assert_eq!(terminal_for_name("number"), Some(r"terminal FLOAT: [-+]?[0-9]*\.?[0-9]+;"));
    assert_eq!(terminal_for_name("text"), None);
}

#[test]
fn test_dedupe_twice_is_stable() {
    let kinds = [
        PrimitiveKind::Date,
        PrimitiveKind::String,
        PrimitiveKind::Date,
        PrimitiveKind::BigInt,
    ];
    let once = dedupe(&kinds);
    assert_eq!(once, vec![PrimitiveKind::Date, PrimitiveKind::String, PrimitiveKind::BigInt]);
    assert_eq!(dedupe(&once), once);
}
