// ============================================================================
// Field Filter
// Single-field equality and range predicates
// ============================================================================

use std::cmp::Ordering;

use super::document::{Document, FieldValue};
use crate::numeric::compare_values;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Comparison against a constant
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Predicate {
    Eq(FieldValue),
    Ne(FieldValue),
    Gt(FieldValue),
    Gte(FieldValue),
    Lt(FieldValue),
    Lte(FieldValue),
}

/// Predicate applied to one named field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldFilter {
    pub field: String,
    pub predicate: Predicate,
}

/// Order two field values of the same type bracket.
///
/// Numbers of every kind form one bracket and compare by value; other values
/// only compare with their own type. `None` means the brackets differ.
pub fn compare_field_values(a: &FieldValue, b: &FieldValue) -> Option<Ordering> {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => Some(compare_values(x, y)),
        (FieldValue::String(x), FieldValue::String(y)) => Some(x.cmp(y)),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => Some(x.cmp(y)),
        (FieldValue::Null, FieldValue::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

impl FieldFilter {
    pub fn new(field: &str, predicate: Predicate) -> Self {
        Self {
            field: field.to_string(),
            predicate,
        }
    }

    pub fn eq(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Predicate::Eq(value.into()))
    }

    pub fn ne(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Predicate::Ne(value.into()))
    }

    pub fn gt(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Predicate::Gt(value.into()))
    }

    pub fn gte(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Predicate::Gte(value.into()))
    }

    pub fn lt(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Predicate::Lt(value.into()))
    }

    pub fn lte(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field, Predicate::Lte(value.into()))
    }

    /// Evaluate against a document.
    ///
    /// A missing field behaves as `null` for `Eq`/`Ne` and never satisfies a
    /// range predicate.
    pub fn matches(&self, document: &Document) -> bool {
        let current = document.get(&self.field).unwrap_or(&FieldValue::Null);
        match &self.predicate {
            Predicate::Eq(target) => {
                compare_field_values(current, target) == Some(Ordering::Equal)
            }
            Predicate::Ne(target) => {
                compare_field_values(current, target) != Some(Ordering::Equal)
            }
            Predicate::Gt(target) => {
                Self::in_range(current, target, |o| o == Ordering::Greater)
            }
            Predicate::Gte(target) => {
                Self::in_range(current, target, |o| o != Ordering::Less)
            }
            Predicate::Lt(target) => {
                Self::in_range(current, target, |o| o == Ordering::Less)
            }
            Predicate::Lte(target) => {
                Self::in_range(current, target, |o| o != Ordering::Greater)
            }
        }
    }

    fn in_range(current: &FieldValue, target: &FieldValue, accept: impl Fn(Ordering) -> bool) -> bool {
        if matches!(current, FieldValue::Null) {
            return false;
        }
        compare_field_values(current, target).is_some_and(accept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericValue;

    fn doc_with(value: impl Into<FieldValue>) -> Document {
        Document::new().with_field("a", value)
    }

    fn dec(s: &str) -> NumericValue {
        NumericValue::decimal(s).unwrap()
    }

    #[test]
    fn test_equality_across_kinds() {
        let filter = FieldFilter::eq("a", NumericValue::Int32(11));
        assert!(filter.matches(&doc_with(dec("11.0"))));
        assert!(filter.matches(&doc_with(dec("11.00"))));
        assert!(filter.matches(&doc_with(NumericValue::long(11))));
        assert!(filter.matches(&doc_with(NumericValue::Double(11.0))));
        assert!(!filter.matches(&doc_with(dec("11.00000000000000000000000000000001"))));
        assert!(!filter.matches(&doc_with("11")));
    }

    #[test]
    fn test_range_predicates() {
        let doc = doc_with(dec("0.1"));
        assert!(FieldFilter::lt("a", NumericValue::Double(0.1)).matches(&doc));
        assert!(FieldFilter::lte("a", dec("0.10")).matches(&doc));
        assert!(FieldFilter::gte("a", dec("0.10")).matches(&doc));
        assert!(!FieldFilter::gt("a", dec("0.10")).matches(&doc));
        assert!(FieldFilter::gt("a", NumericValue::Int32(0)).matches(&doc));
        // Different type bracket never satisfies a range
        assert!(!FieldFilter::gt("a", "0").matches(&doc));
    }

    #[test]
    fn test_missing_field() {
        let doc = Document::new().with_field("b", NumericValue::Int32(1));
        assert!(FieldFilter::eq("a", FieldValue::Null).matches(&doc));
        assert!(!FieldFilter::eq("a", NumericValue::Int32(0)).matches(&doc));
        assert!(FieldFilter::ne("a", NumericValue::Int32(0)).matches(&doc));
        assert!(!FieldFilter::gte("a", NumericValue::Int32(0)).matches(&doc));
        assert!(!FieldFilter::lt("a", NumericValue::Int32(0)).matches(&doc));
    }

    #[test]
    fn test_non_numeric_values() {
        let doc = doc_with("banana");
        assert!(FieldFilter::gt("a", "apple").matches(&doc));
        assert!(FieldFilter::eq("a", "banana").matches(&doc));
        assert!(FieldFilter::ne("a", NumericValue::Int32(1)).matches(&doc));
    }
}
