//! Transformation settings.
//!
//! Every field has a default, so a file only lists what it overrides:
//!
//! ```yaml
//! grammar_name: StateMachine
//! entry_rule: Model
//! association_arity: lenient
//! composite_optionality: always_required
//! ```

use crate::TransformError;

/// How associations with an unsupported number of navigable ends are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum AssociationArityPolicy {
    /// Fail with [`TransformError::InvalidAssociationArity`].
    #[default]
    Strict,
    /// Skip the association and log a warning.
    Lenient,
}

/// Which attributes produced from properties may be optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum OptionalityPolicy {
    /// Optional whenever the lower bound is 0, composite or not.
    #[default]
    LowerBound,
    /// Composite-owned properties are always required; others follow the lower bound.
    AlwaysRequired,
}

/// Settings for a transformation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(default, rename_all = "snake_case"))]
pub struct TransformConfig {
    /// Name written in the `grammar` header.
    pub grammar_name: String,
    /// Name of the entry parser rule.
    pub entry_rule: String,
    pub association_arity: AssociationArityPolicy,
    pub composite_optionality: OptionalityPolicy,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            grammar_name: "MyGrammar".to_string(),
            entry_rule: "Model".to_string(),
            association_arity: AssociationArityPolicy::default(),
            composite_optionality: OptionalityPolicy::default(),
        }
    }
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grammar_name(mut self, name: impl Into<String>) -> Self {
        self.grammar_name = name.into();
        self
    }

    pub fn with_entry_rule(mut self, rule: impl Into<String>) -> Self {
        self.entry_rule = rule.into();
        self
    }

    pub fn with_association_arity(mut self, policy: AssociationArityPolicy) -> Self {
        self.association_arity = policy;
        self
    }

    pub fn with_composite_optionality(mut self, policy: OptionalityPolicy) -> Self {
        self.composite_optionality = policy;
        self
    }
}

#[cfg(feature = "interchange")]
impl TransformConfig {
    /// Parse a YAML configuration.
    pub fn from_yaml_str(input: &str) -> Result<Self, TransformError> {
        serde_yaml::from_str(input).map_err(|e| TransformError::config(format!("YAML: {e}")))
    }

    /// Parse a JSON configuration.
    pub fn from_json_str(input: &str) -> Result<Self, TransformError> {
        serde_json::from_str(input).map_err(|e| TransformError::config(format!("JSON: {e}")))
    }

    /// Load a configuration file, choosing the format by extension.
    pub fn load(path: &std::path::Path) -> Result<Self, TransformError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        let config = match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(TransformError::config(format!(
                    "unsupported configuration file '{}' (expected .yaml, .yml or .json)",
                    path.display()
                )));
            }
        };
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
