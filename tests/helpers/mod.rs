//! Raw model builders shared by the integration tests.
#![allow(dead_code)]

use uml2grammar::interchange::RawNode;
use uml2grammar::uml::kinds;

pub fn element(kind: &str, id: &str, name: &str) -> RawNode {
    RawNode::new()
        .with_attr("xmi:type", kind)
        .with_attr("xmi:id", id)
        .with_attr("name", name)
}

pub fn class(id: &str, name: &str) -> RawNode {
    element(kinds::CLASS, id, name)
}

pub fn primitive(id: &str, name: &str) -> RawNode {
    element(kinds::PRIMITIVE_TYPE, id, name)
}

pub fn enumeration(id: &str, name: &str, literals: &[&str]) -> RawNode {
    literals
        .iter()
        .enumerate()
        .fold(element(kinds::ENUMERATION, id, name), |node, (i, literal)| {
            node.with_child(
                "ownedLiteral",
                element("uml:EnumerationLiteral", &format!("{id}_{i}"), literal),
            )
        })
}

pub fn property(id: &str, name: &str, type_id: &str) -> RawNode {
    RawNode::new()
        .with_attr("xmi:id", id)
        .with_attr("name", name)
        .with_attr("type", type_id)
}

pub fn generalization(id: &str, general: &str) -> RawNode {
    RawNode::new()
        .with_attr("xmi:id", id)
        .with_attr("general", general)
}

/// Association `id` owning `ends`; `navigable` is the raw `navigableOwnedEnd` value.
pub fn association(id: &str, navigable: Option<&str>, ends: [RawNode; 2]) -> RawNode {
    let [first, second] = ends;
    let node = element(kinds::ASSOCIATION, id, id)
        .with_child("ownedEnd", first)
        .with_child("ownedEnd", second);
    match navigable {
        Some(navigable) => node.with_attr("navigableOwnedEnd", navigable),
        None => node,
    }
}

/// `State{name: String}` and `Transition{}` joined by association `a1`.
pub fn state_transition(navigable: Option<&str>) -> Vec<RawNode> {
    vec![
        class("state", "State").with_child("ownedAttribute", property("state_name", "name", "string")),
        class("transition", "Transition"),
        primitive("string", "String"),
        association(
            "a1",
            navigable,
            [
                property("a1_transition", "transition", "transition"),
                property("a1_state", "state", "state"),
            ],
        ),
    ]
}
