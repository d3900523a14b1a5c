use proptest::prelude::*;

use veriflow_types::{FieldDefinition, FieldType, ValidationRules};
use veriflow_validation::{field, ValidationError};

proptest! {
    /// Required fields always fail on empty values; optional fields never do.
    #[test]
    fn empty_value_outcome_depends_only_on_required(
        id in "[a-z_]{1,16}",
        required in any::<bool>(),
        blanks in " {0,8}",
    ) {
        let mut field_def = FieldDefinition::new(id, "Label", FieldType::Text)
            .with_rules(ValidationRules::new().with_min_length(3));
        if required {
            field_def.required = true;
        }

        let result = field::validate(&field_def, Some(&blanks));
        if required {
            prop_assert_eq!(result, Some(ValidationError::Required));
        } else {
            prop_assert_eq!(result, None);
        }
    }

    /// Validation is deterministic: the same (field, value) pair always
    /// yields the same result.
    #[test]
    fn validate_is_deterministic(value in ".{0,32}") {
        let field_def = FieldDefinition::new("name", "Name", FieldType::Text)
            .required()
            .with_rules(
                ValidationRules::new()
                    .with_pattern(r"^[A-Za-z ]+$").unwrap()
                    .with_min_length(2)
                    .with_max_length(16),
            );

        let first = field::validate(&field_def, Some(&value));
        let second = field::validate(&field_def, Some(&value));
        prop_assert_eq!(first, second);
    }

    /// Length bounds are enforced on character count, not bytes.
    #[test]
    fn length_bounds_use_chars(len in 0usize..24) {
        let value: String = "é".repeat(len);
        let field_def = FieldDefinition::new("name", "Name", FieldType::Text)
            .with_rules(ValidationRules::new().with_min_length(4).with_max_length(12));

        let result = field::validate(&field_def, Some(&value));
        if len == 0 {
            prop_assert_eq!(result, None); // optional + empty
        } else if len < 4 {
            prop_assert_eq!(result, Some(ValidationError::TooShort(4)));
        } else if len > 12 {
            prop_assert_eq!(result, Some(ValidationError::TooLong(12)));
        } else {
            prop_assert_eq!(result, None);
        }
    }

    /// Numeric bounds accept exactly the closed interval [min, max].
    #[test]
    fn numeric_bounds_are_inclusive(n in -1_000i64..1_000) {
        let field_def = FieldDefinition::new("amount", "Amount", FieldType::Number)
            .required()
            .with_rules(ValidationRules::new().with_min(-100.0).with_max(100.0));

        let result = field::validate(&field_def, Some(&n.to_string()));
        if n < -100 {
            prop_assert_eq!(result, Some(ValidationError::BelowMinimum(-100.0)));
        } else if n > 100 {
            prop_assert_eq!(result, Some(ValidationError::AboveMaximum(100.0)));
        } else {
            prop_assert_eq!(result, None);
        }
    }
}
