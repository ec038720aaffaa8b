//! Grammar text output.
//!
//! ```text
//! grammar StateMachine
//!
//! entry Model:
//!     (elements+=ID)*;
//!
//! interface State {
//!     name: string
//!     transition?: @Transition
//! }
//!
//! type Color = 'RED' | 'GREEN';
//!
//! hidden terminal WS: /\s+/;
//! terminal ID: /[_a-zA-Z][\w_]*/;
//! terminal STRING: ...;
//! ```

use std::fmt::Write;

use super::{
    Grammar, GrammarElement, Interface, SimpleType, TypeDefinition, UnionType, terminal_for,
};

const INDENT: &str = "    ";
const WS_TERMINAL: &str = r"hidden terminal WS: /\s+/;";
const ID_TERMINAL: &str = r"terminal ID: /[_a-zA-Z][\w_]*/;";

/// Display form of an attribute type: `string`, `Bar`, `Foo[]`.
///
/// References print the referenced name; [`render`] marks them with `@`.
pub fn type_string(ty: &TypeDefinition) -> String {
    match ty {
        TypeDefinition::Simple(simple) | TypeDefinition::Reference(simple) => {
            simple_string(simple).to_string()
        }
        TypeDefinition::Array(element) => format!("{}[]", type_string(element)),
    }
}

/// Attribute type as written in an interface body: cross-references to
/// named types get a leading `@`.
fn attribute_type(ty: &TypeDefinition) -> String {
    match ty {
        TypeDefinition::Reference(simple @ SimpleType::Named(_)) => {
            format!("@{}", simple_string(simple))
        }
        TypeDefinition::Array(element) => format!("{}[]", attribute_type(element)),
        TypeDefinition::Simple(_) | TypeDefinition::Reference(_) => type_string(ty),
    }
}

fn simple_string(simple: &SimpleType) -> &str {
    match simple {
        SimpleType::Primitive(kind) => kind.as_str(),
        SimpleType::Named(type_ref) => type_ref.name().as_str(),
    }
}

/// Render a grammar as text.
pub fn render(grammar: &Grammar) -> String {
    let mut renderer = Renderer::default();
    renderer.grammar(grammar);
    renderer.output
}

#[derive(Default)]
struct Renderer {
    output: String,
}

impl Renderer {
    fn write_line(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
    }

    fn write_blank_line(&mut self) {
        let _ = writeln!(self.output);
    }

    fn grammar(&mut self, grammar: &Grammar) {
        self.write_line(&format!("grammar {}", grammar.name));
        self.write_blank_line();

        self.entry_rule(grammar);

        for element in grammar.elements() {
            self.write_blank_line();
            match element {
                GrammarElement::Interface(interface) => self.interface(interface),
                GrammarElement::Union(union) => self.union(union),
            }
        }

        self.write_blank_line();
        self.write_line(WS_TERMINAL);
        self.write_line(ID_TERMINAL);
        for &kind in grammar.primitive_types() {
            self.write_line(terminal_for(kind));
        }
    }

    /// Interfaces are declared types, not parser rules, so the entry rule
    /// only calls the `ID` terminal.
    fn entry_rule(&mut self, grammar: &Grammar) {
        self.write_line(&format!("entry {}:", grammar.entry_rule));
        self.write_line(&format!("{INDENT}(elements+=ID)*;"));
    }

    fn interface(&mut self, interface: &Interface) {
        let mut header = format!("interface {}", interface.name);
        if !interface.super_types.is_empty() {
            let super_types = interface
                .super_types
                .iter()
                .map(|super_type| super_type.name().as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(header, " extends {super_types}");
        }

        if interface.attributes.is_empty() {
            self.write_line(&format!("{header} {{}}"));
            return;
        }

        self.write_line(&format!("{header} {{"));
        for attribute in &interface.attributes {
            let optional = if attribute.is_optional { "?" } else { "" };
            self.write_line(&format!(
                "{INDENT}{}{optional}: {}",
                attribute.name,
                attribute_type(&attribute.ty)
            ));
        }
        self.write_line("}");
    }

    fn union(&mut self, union: &UnionType) {
        if union.literals.is_empty() {
            self.write_line(&format!("// enumeration {} has no literals", union.name));
            return;
        }
        let literals = union.entries()[1..].join(" | ");
        self.write_line(&format!("type {} = {literals};", union.name));
    }
}
