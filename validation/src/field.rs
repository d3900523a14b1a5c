//! Single-field rule evaluation.
//!
//! Pure: no side effects, same `(field, value)` always yields the same
//! result. Evaluation order is fixed and the first failure wins:
//! required → pattern → length bounds → numeric bounds → custom.

use crate::error::ValidationError;
use veriflow_types::FieldDefinition;

/// Validate one value against one field definition.
///
/// `None` and whitespace-only values both count as empty. An optional
/// field with an empty value short-circuits to success — format rules
/// never fire on a value the user was allowed to omit.
pub fn validate(field: &FieldDefinition, value: Option<&str>) -> Option<ValidationError> {
    let trimmed = value.map(str::trim).unwrap_or("");

    if trimmed.is_empty() {
        if field.required {
            return Some(ValidationError::Required);
        }
        return None;
    }

    let rules = &field.rules;

    if let Some(pattern) = &rules.pattern {
        if !pattern.is_match(trimmed) {
            return Some(ValidationError::InvalidFormat);
        }
    }

    let len = trimmed.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            return Some(ValidationError::TooShort(min));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Some(ValidationError::TooLong(max));
        }
    }

    if rules.min.is_some() || rules.max.is_some() {
        let Ok(number) = trimmed.parse::<f64>() else {
            return Some(ValidationError::NotANumber);
        };
        if let Some(min) = rules.min {
            if number < min {
                return Some(ValidationError::BelowMinimum(min));
            }
        }
        if let Some(max) = rules.max {
            if number > max {
                return Some(ValidationError::AboveMaximum(max));
            }
        }
    }

    if let Some(custom) = &rules.custom {
        if let Some(message) = custom(trimmed) {
            return Some(ValidationError::Custom(message));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriflow_types::{FieldType, ValidationRules};

    fn email_field() -> FieldDefinition {
        FieldDefinition::new("email", "Email", FieldType::Email)
            .required()
            .with_rules(
                ValidationRules::new()
                    .with_pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
                    .unwrap(),
            )
    }

    #[test]
    fn required_empty_fails_first() {
        assert_eq!(
            validate(&email_field(), None),
            Some(ValidationError::Required)
        );
        assert_eq!(
            validate(&email_field(), Some("   ")),
            Some(ValidationError::Required)
        );
    }

    #[test]
    fn optional_empty_short_circuits_to_success() {
        let field = FieldDefinition::new("middle_name", "Middle name", FieldType::Text)
            .with_rules(ValidationRules::new().with_min_length(2));
        assert_eq!(validate(&field, None), None);
        assert_eq!(validate(&field, Some("")), None);
        // A present value is still checked.
        assert_eq!(
            validate(&field, Some("x")),
            Some(ValidationError::TooShort(2))
        );
    }

    #[test]
    fn pattern_beats_length_checks() {
        let field = FieldDefinition::new("code", "Code", FieldType::Text)
            .required()
            .with_rules(
                ValidationRules::new()
                    .with_pattern(r"^\d+$")
                    .unwrap()
                    .with_min_length(6),
            );
        // "abc" fails both pattern and min_length; pattern is reported.
        assert_eq!(
            validate(&field, Some("abc")),
            Some(ValidationError::InvalidFormat)
        );
        assert_eq!(
            validate(&field, Some("123")),
            Some(ValidationError::TooShort(6))
        );
        assert_eq!(validate(&field, Some("123456")), None);
    }

    #[test]
    fn numeric_bounds() {
        let field = FieldDefinition::new("monthly_income", "Monthly income", FieldType::Number)
            .required()
            .with_rules(ValidationRules::new().with_min(0.0).with_max(1_000_000.0));
        assert_eq!(
            validate(&field, Some("-5")),
            Some(ValidationError::BelowMinimum(0.0))
        );
        assert_eq!(
            validate(&field, Some("2000000")),
            Some(ValidationError::AboveMaximum(1_000_000.0))
        );
        assert_eq!(
            validate(&field, Some("abc")),
            Some(ValidationError::NotANumber)
        );
        assert_eq!(validate(&field, Some("1500.50")), None);
    }

    #[test]
    fn custom_runs_last() {
        let field = FieldDefinition::new("bvn", "BVN", FieldType::Text)
            .required()
            .with_rules(
                ValidationRules::new()
                    .with_min_length(11)
                    .with_custom(|v| {
                        (!v.chars().all(|c| c.is_ascii_digit()))
                            .then(|| "BVN must be digits only".to_string())
                    }),
            );
        // min_length fires before custom.
        assert_eq!(
            validate(&field, Some("12345")),
            Some(ValidationError::TooShort(11))
        );
        assert_eq!(
            validate(&field, Some("1234567890x")),
            Some(ValidationError::Custom("BVN must be digits only".into()))
        );
        assert_eq!(validate(&field, Some("12345678901")), None);
    }

    #[test]
    fn valid_email_passes() {
        assert_eq!(validate(&email_field(), Some("amina@example.com")), None);
        assert_eq!(
            validate(&email_field(), Some("not-an-email")),
            Some(ValidationError::InvalidFormat)
        );
    }
}
