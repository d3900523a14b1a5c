//! Field definitions — a single typed input with validation rules.
//!
//! Definitions are immutable configuration: built once when the session is
//! configured, then only read. The `pattern` rule is compiled to a
//! [`regex::Regex`] here so validation never pays a per-keystroke compile.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The closed set of input kinds the verification form renders.
///
/// The UI layer maps each variant to a widget and keyboard type; the
/// engine carries it as configuration and validates through the attached
/// [`ValidationRules`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Date,
    Select,
    Textarea,
    Number,
    Password,
}

/// A pluggable validation predicate.
///
/// Returns `None` when the value passes, or the error message to show when
/// it does not.
pub type CustomRule = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The validation rules attached to one field.
///
/// All rules are optional; an empty rule set accepts any value (subject to
/// the field's `required` flag, which lives on [`FieldDefinition`]).
#[derive(Clone, Default)]
pub struct ValidationRules {
    /// Regex the whole value must match.
    pub pattern: Option<Regex>,
    /// Minimum value length in characters.
    pub min_length: Option<usize>,
    /// Maximum value length in characters.
    pub max_length: Option<usize>,
    /// Minimum numeric value (inclusive).
    pub min: Option<f64>,
    /// Maximum numeric value (inclusive).
    pub max: Option<f64>,
    /// Custom predicate, evaluated last.
    pub custom: Option<CustomRule>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a regex pattern. Fails if the pattern does not compile.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_custom(
        mut self,
        rule: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(Arc::new(rule));
        self
    }
}

impl fmt::Debug for ValidationRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRules")
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A single typed input with validation rules.
#[derive(Clone, Debug)]
pub struct FieldDefinition {
    /// Stable identifier; key into the session's form data.
    pub id: String,
    /// Display name, carried as opaque data for the UI layer.
    pub label: String,
    pub field_type: FieldType,
    /// Whether an empty value fails validation.
    pub required: bool,
    pub rules: ValidationRules,
    /// Choices for [`FieldType::Select`] fields; empty otherwise.
    pub options: Vec<String>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            rules: ValidationRules::default(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_flags() {
        let field = FieldDefinition::new("first_name", "First name", FieldType::Text)
            .required()
            .with_rules(ValidationRules::new().with_min_length(2));
        assert!(field.required);
        assert_eq!(field.rules.min_length, Some(2));
        assert!(field.rules.pattern.is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected_at_build_time() {
        assert!(ValidationRules::new().with_pattern("([unclosed").is_err());
    }

    #[test]
    fn debug_omits_custom_rule_body() {
        let rules = ValidationRules::new().with_custom(|_| None);
        let rendered = format!("{rules:?}");
        assert!(rendered.contains("<fn>"));
    }
}
