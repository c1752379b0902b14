// ============================================================================
// Field Adapter
// Resolves a document field, runs an operator, writes the result back
// ============================================================================

use crate::domain::{Document, FieldValue};
use crate::interfaces::UpdateOperator;
use crate::numeric::{NumericError, NumericResult, NumericValue, Signals};

/// Computed change to one field, not yet applied
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMutation {
    pub field: String,

    /// `None` when the field did not exist
    pub previous: Option<NumericValue>,

    pub value: NumericValue,

    pub signals: Signals,

    /// False when the new value is representationally identical to the old
    pub changed: bool,
}

impl FieldMutation {
    pub fn precision_lost(&self) -> bool {
        self.signals.is_inexact()
    }
}

/// Compute the new value of `field` without touching the document.
///
/// A missing field takes the operator's missing-field value. A field holding
/// a non-numeric value fails with `TypeMismatch` naming the stored type.
pub fn evaluate_field(
    document: &Document,
    field: &str,
    operator: &dyn UpdateOperator,
    operand: &NumericValue,
) -> NumericResult<FieldMutation> {
    let previous = match document.get(field) {
        None => None,
        Some(FieldValue::Number(current)) => Some(*current),
        Some(other) => {
            return Err(NumericError::TypeMismatch {
                operator: operator.name(),
                found: other.type_name(),
            })
        },
    };

    let (value, signals) = match &previous {
        Some(current) => {
            let outcome = operator.apply(current, operand)?;
            (outcome.value, outcome.signals)
        },
        None => (operator.value_for_missing_field(operand)?, Signals::NONE),
    };

    Ok(FieldMutation {
        field: field.to_string(),
        changed: !previous.is_some_and(|old| old.same_representation(&value)),
        previous,
        value,
        signals,
    })
}

/// Store a computed mutation. Unchanged fields are left alone.
pub fn write_back(document: &mut Document, mutation: &FieldMutation) {
    if mutation.changed {
        document.set(&mutation.field, FieldValue::Number(mutation.value));
    }
}

/// `evaluate_field` followed by `write_back`; the document is untouched on error.
pub fn apply_to_field(
    document: &mut Document,
    field: &str,
    operator: &dyn UpdateOperator,
    operand: &NumericValue,
) -> NumericResult<FieldMutation> {
    let mutation = evaluate_field(document, field, operator, operand)?;
    write_back(document, &mutation);
    Ok(mutation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BitwiseOp;
    use crate::engine::{Bitwise, Increment, Multiply};

    fn dec(text: &str) -> NumericValue {
        NumericValue::decimal(text).unwrap()
    }

    #[test]
    fn test_increment_existing_field() {
        let mut doc = Document::new().with_field("a", dec("1.0"));
        let mutation = apply_to_field(&mut doc, "a", &Increment::default(), &dec("10")).unwrap();

        assert_eq!(mutation.previous, Some(dec("1.0")));
        assert!(mutation.changed);
        assert_eq!(doc.get_number("a"), Some(&dec("11.0")));
    }

    #[test]
    fn test_missing_field() {
        let mut doc = Document::new();
        let mutation = apply_to_field(&mut doc, "n", &Multiply::default(), &dec("3")).unwrap();

        assert_eq!(mutation.previous, None);
        assert!(mutation.changed);
        assert_eq!(doc.get_number("n"), Some(&dec("0")));
    }

    #[test]
    fn test_unchanged_value_not_written() {
        let mut doc = Document::new().with_field("a", dec("1.00"));
        let mutation = apply_to_field(&mut doc, "a", &Increment::default(), &NumericValue::Int32(0)).unwrap();
        assert!(!mutation.changed);
        assert_eq!(doc.get_number("a"), Some(&dec("1.00")));
    }

    #[test]
    fn test_negative_zero_overwritten_by_positive_zero() {
        let mut doc = Document::new().with_field("d", NumericValue::Double(-0.0));
        let mutation =
            apply_to_field(&mut doc, "d", &Increment::default(), &NumericValue::Int32(0)).unwrap();
        assert!(mutation.changed);
        assert!(doc
            .get_number("d")
            .unwrap()
            .same_representation(&NumericValue::Double(0.0)));
    }

    #[test]
    fn test_nan_stays_unchanged() {
        let mut doc = Document::new().with_field("d", NumericValue::Double(f64::NAN));
        let mutation =
            apply_to_field(&mut doc, "d", &Increment::default(), &NumericValue::Int32(1)).unwrap();
        assert!(!mutation.changed);
        assert!(doc.get_number("d").unwrap().is_nan());
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let mut doc = Document::new().with_field("s", "text").with_field("z", FieldValue::Null);

        let result = apply_to_field(&mut doc, "s", &Increment::default(), &NumericValue::Int32(1));
        assert_eq!(
            result,
            Err(NumericError::TypeMismatch {
                operator: "$inc",
                found: "string"
            })
        );
        assert_eq!(doc.get("s"), Some(&FieldValue::String("text".to_string())));

        let result = evaluate_field(&doc, "z", &Multiply::default(), &NumericValue::Int32(1));
        assert_eq!(
            result,
            Err(NumericError::TypeMismatch {
                operator: "$mul",
                found: "null"
            })
        );
    }

    #[test]
    fn test_operator_failure_leaves_document() {
        let mut doc = Document::new().with_field("a", dec("5"));
        let before = doc.clone();
        let result = apply_to_field(&mut doc, "a", &Bitwise::new(BitwiseOp::Or), &NumericValue::Int32(1));
        assert!(result.is_err());
        assert_eq!(doc, before);
    }
}
