// ============================================================================
// Bitwise Operator ($bit)
// AND / OR / XOR on integer fields
// ============================================================================

use crate::domain::update::BitwiseOp;
use crate::interfaces::{OperatorOutcome, UpdateOperator};
use crate::numeric::{NumericError, NumericResult, NumericValue};

/// `$bit` with a fixed operation. Only int and long values take part;
/// doubles and decimals are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitwise {
    op: BitwiseOp,
}

impl Bitwise {
    pub fn new(op: BitwiseOp) -> Self {
        Self { op }
    }

    pub fn op(&self) -> BitwiseOp {
        self.op
    }

    fn mismatch(&self, value: &NumericValue) -> NumericError {
        tracing::warn!(operator = self.name(), kind = %value.kind(), "Bitwise update on non-integer value");
        NumericError::TypeMismatch {
            operator: self.name(),
            found: value.kind().name(),
        }
    }
}

impl UpdateOperator for Bitwise {
    fn apply(&self, current: &NumericValue, operand: &NumericValue) -> NumericResult<OperatorOutcome> {
        use NumericValue::*;

        let value = match (current, operand) {
            (Int32(a), Int32(b)) => Int32(self.op.apply_i32(*a, *b)),
            (Int32(a), Int64(b)) => Int64(self.op.apply_i64(i64::from(*a), *b)),
            (Int64(a), Int32(b)) => Int64(self.op.apply_i64(*a, i64::from(*b))),
            (Int64(a), Int64(b)) => Int64(self.op.apply_i64(*a, *b)),
            (Double(_) | Decimal128(_), _) => return Err(self.mismatch(current)),
            (_, Double(_) | Decimal128(_)) => return Err(self.mismatch(operand)),
        };
        Ok(OperatorOutcome::exact(value))
    }

    /// A missing field is treated as zero of the operand's kind.
    fn value_for_missing_field(&self, operand: &NumericValue) -> NumericResult<NumericValue> {
        match operand {
            NumericValue::Int32(b) => Ok(NumericValue::Int32(self.op.apply_i32(0, *b))),
            NumericValue::Int64(b) => Ok(NumericValue::Int64(self.op.apply_i64(0, *b))),
            NumericValue::Double(_) | NumericValue::Decimal128(_) => Err(self.mismatch(operand)),
        }
    }

    fn name(&self) -> &'static str {
        "$bit"
    }
}
