//! Primitive kinds of the target grammar and their terminal rules.

use rustc_hash::FxHashSet;

/// A primitive type understood by the target grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Number,
    BigInt,
    Date,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 5] = [
        Self::String,
        Self::Boolean,
        Self::Number,
        Self::BigInt,
        Self::Date,
    ];

    /// Name of the kind as written in grammar type expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::Date => "Date",
        }
    }

    /// Inverse of [`PrimitiveKind::as_str`].
    pub fn from_grammar_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a UML primitive type name to a grammar primitive.
///
/// Matching ignores case and accepts the aliases `str`, `bool`, `double`
/// and `int`. Returns `None` for any other name.
pub fn convert_primitive(name: &str) -> Option<PrimitiveKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "string" | "str" => Some(PrimitiveKind::String),
        "boolean" | "bool" => Some(PrimitiveKind::Boolean),
        "float" | "double" => Some(PrimitiveKind::Number),
        "integer" | "int" => Some(PrimitiveKind::BigInt),
        "date" => Some(PrimitiveKind::Date),
        _ => None,
    }
}

/// Terminal rule declaring the lexical form of `kind`.
pub fn terminal_for(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => r#"terminal STRING: /"(\\.|[^"\\])*"|'(\\.|[^'\\])*'/;"#,
        PrimitiveKind::Boolean => r"terminal BOOLEAN: /\b(?:true|false)\b/;",
        PrimitiveKind::Number => r"terminal FLOAT: [-+]?[0-9]*\.?[0-9]+;",
        PrimitiveKind::BigInt => r"terminal INT: ^\d+$;",
        PrimitiveKind::Date => {
            r"terminal DATE: /^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/(\d{4}|\d{2})$;"
        }
    }
}

/// Terminal rule for a kind given by its grammar name; `None` if unknown.
pub fn terminal_for_name(name: &str) -> Option<&'static str> {
    PrimitiveKind::from_grammar_name(name).map(terminal_for)
}

/// Drop repeated kinds, keeping the first occurrence of each.
pub fn dedupe(kinds: &[PrimitiveKind]) -> Vec<PrimitiveKind> {
    let mut seen = FxHashSet::default();
    kinds
        .iter()
        .copied()
        .filter(|kind| seen.insert(*kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("string", Some(PrimitiveKind::String))]
    #[case("String", Some(PrimitiveKind::String))]
    #[case("str", Some(PrimitiveKind::String))]
    #[case("BOOLEAN", Some(PrimitiveKind::Boolean))]
    #[case("bool", Some(PrimitiveKind::Boolean))]
    #[case("float", Some(PrimitiveKind::Number))]
    #[case("Double", Some(PrimitiveKind::Number))]
    #[case("integer", Some(PrimitiveKind::BigInt))]
    #[case("Int", Some(PrimitiveKind::BigInt))]
    #[case("date", Some(PrimitiveKind::Date))]
    #[case("Real", None)]
    #[case("UnlimitedNatural", None)]
    #[case("", None)]
    fn test_convert_primitive(#[case] name: &str, #[case] expected: Option<PrimitiveKind>) {
        assert_eq!(convert_primitive(name), expected);
    }

    #[test]
    fn test_every_kind_has_a_terminal() {
        for kind in PrimitiveKind::ALL {
            assert!(terminal_for(kind).starts_with("terminal "), "{kind}");
            assert_eq!(terminal_for_name(kind.as_str()), Some(terminal_for(kind)));
        }
    }

    #[test]
    fn test_terminal_lookup_failure() {
        assert_eq!(terminal_for_name("decimal"), None);
        // grammar names are case sensitive
        assert_eq!(terminal_for_name("date"), None);
    }

    #[test]
    fn test_string_terminal_text() {
        assert_eq!(
            terminal_for(PrimitiveKind::String),
            r#"terminal STRING: /"(\\.|[^"\\])*"|'(\\.|[^'\\])*'/;"#
        );
        assert_eq!(terminal_for(PrimitiveKind::BigInt), "terminal INT: ^\\d+$;");
    }

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        use PrimitiveKind::*;
        let kinds = [Number, String, Number, Date, String, Number];
        assert_eq!(dedupe(&kinds), vec![Number, String, Date]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        use PrimitiveKind::*;
        let once = dedupe(&[Boolean, Boolean, BigInt, Boolean]);
        assert_eq!(dedupe(&once), once);
        assert!(dedupe(&[]).is_empty());
    }
}
