// ============================================================================
// Update Model
// Single-field update specifications and multi-document results
// ============================================================================

use super::document::DocumentId;
use crate::numeric::{NumericError, NumericValue};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bitwise operation applied by `$bit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

impl BitwiseOp {
    pub fn apply_i32(self, lhs: i32, rhs: i32) -> i32 {
        match self {
            BitwiseOp::And => lhs & rhs,
            BitwiseOp::Or => lhs | rhs,
            BitwiseOp::Xor => lhs ^ rhs,
        }
    }

    pub fn apply_i64(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            BitwiseOp::And => lhs & rhs,
            BitwiseOp::Or => lhs | rhs,
            BitwiseOp::Xor => lhs ^ rhs,
        }
    }
}

/// Update operator selected by an update specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateOperatorType {
    /// `$inc`
    Increment,
    /// `$mul`
    Multiply,
    /// `$bit`
    Bitwise(BitwiseOp),
}

/// `{ <operator>: { <field>: <operand> } }`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpdateSpec<'a> {
    pub field: &'a str,
    pub operator: UpdateOperatorType,
    pub operand: NumericValue,
}

impl<'a> UpdateSpec<'a> {
    pub fn new(field: &'a str, operator: UpdateOperatorType, operand: NumericValue) -> Self {
        Self {
            field,
            operator,
            operand,
        }
    }

    /// `{ $inc: { field: operand } }`
    pub fn inc(field: &'a str, operand: impl Into<NumericValue>) -> Self {
        Self::new(field, UpdateOperatorType::Increment, operand.into())
    }

    /// `{ $mul: { field: operand } }`
    pub fn mul(field: &'a str, operand: impl Into<NumericValue>) -> Self {
        Self::new(field, UpdateOperatorType::Multiply, operand.into())
    }

    pub fn bit_and(field: &'a str, operand: impl Into<NumericValue>) -> Self {
        Self::new(field, UpdateOperatorType::Bitwise(BitwiseOp::And), operand.into())
    }

    pub fn bit_or(field: &'a str, operand: impl Into<NumericValue>) -> Self {
        Self::new(field, UpdateOperatorType::Bitwise(BitwiseOp::Or), operand.into())
    }

    pub fn bit_xor(field: &'a str, operand: impl Into<NumericValue>) -> Self {
        Self::new(field, UpdateOperatorType::Bitwise(BitwiseOp::Xor), operand.into())
    }
}

/// Outcome of a multi-document update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    /// Documents selected by the filter
    pub matched: usize,

    /// Documents whose field changed representation
    pub modified: usize,

    /// Documents whose stored value was rounded
    pub precision_lost: usize,

    /// Per-document failures, in document order
    pub errors: Vec<(DocumentId, NumericError)>,

    /// True when the batch stopped at its first error
    pub aborted: bool,
}

impl UpdateResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// First recorded failure
    pub fn first_error(&self) -> Option<NumericError> {
        self.errors.first().map(|(_, e)| *e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_constructors() {
        let spec = UpdateSpec::inc("a", NumericValue::decimal("10").unwrap());
        assert_eq!(spec.field, "a");
        assert_eq!(spec.operator, UpdateOperatorType::Increment);

        let spec = UpdateSpec::mul("b", 3i64);
        assert_eq!(spec.operator, UpdateOperatorType::Multiply);
        assert_eq!(spec.operand, NumericValue::Int64(3));

        let spec = UpdateSpec::bit_xor("c", 5);
        assert_eq!(spec.operator, UpdateOperatorType::Bitwise(BitwiseOp::Xor));
    }

    #[test]
    fn test_bitwise_ops() {
        assert_eq!(BitwiseOp::And.apply_i32(0b1100, 0b1010), 0b1000);
        assert_eq!(BitwiseOp::Or.apply_i32(0b1100, 0b1010), 0b1110);
        assert_eq!(BitwiseOp::Xor.apply_i64(0b1100, 0b1010), 0b0110);
    }

    #[test]
    fn test_result_helpers() {
        let mut result = UpdateResult::default();
        assert!(result.is_ok());
        result.errors.push((DocumentId::new(), NumericError::Overflow));
        assert!(!result.is_ok());
        assert_eq!(result.first_error(), Some(NumericError::Overflow));
    }
}
