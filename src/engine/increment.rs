// ============================================================================
// Increment Operator ($inc)
// Adds the operand to the stored value
// ============================================================================

use super::promotion::{check_int64_overflow, finish, promote, Promoted};
use crate::domain::config::ArithmeticPolicy;
use crate::interfaces::{OperatorOutcome, UpdateOperator};
use crate::numeric::{Decimal128, NumericResult, NumericValue};

/// `$inc` under a given arithmetic policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Increment {
    policy: ArithmeticPolicy,
}

impl Increment {
    pub fn new(policy: ArithmeticPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ArithmeticPolicy {
        &self.policy
    }
}

impl UpdateOperator for Increment {
    fn apply(&self, current: &NumericValue, operand: &NumericValue) -> NumericResult<OperatorOutcome> {
        let policy = &self.policy;
        match promote(current, operand, policy) {
            Promoted::Int32(a, b) => Ok(OperatorOutcome::exact(match a.checked_add(b) {
                Some(sum) => NumericValue::Int32(sum),
                None => NumericValue::Int64(i64::from(a) + i64::from(b)),
            })),

            Promoted::Int64(a, b) => match a.checked_add(b) {
                Some(sum) => Ok(OperatorOutcome::exact(NumericValue::Int64(sum))),
                None => {
                    check_int64_overflow(self.name(), policy)?;
                    let (sum, signals) =
                        Decimal128::from(a).add_signaling(&Decimal128::from(b), policy.rounding_mode);
                    finish(self.name(), NumericValue::Decimal128(sum), signals, policy)
                },
            },

            Promoted::Double(a, b, signals) => {
                finish(self.name(), NumericValue::Double(a + b), signals, policy)
            },

            Promoted::Decimal(a, b, conversion) => {
                let (sum, signals) = a.add_signaling(&b, policy.rounding_mode);
                finish(self.name(), NumericValue::Decimal128(sum), conversion | signals, policy)
            },
        }
    }

    /// A missing field is created holding the operand.
    fn value_for_missing_field(&self, operand: &NumericValue) -> NumericResult<NumericValue> {
        Ok(*operand)
    }

    fn name(&self) -> &'static str {
        "$inc"
    }
}

/// `$inc` with the default arithmetic policy
///
/// # Example
/// ```
/// use numeric_engine::engine::increment;
/// use numeric_engine::numeric::NumericValue;
///
/// let sum = increment(&NumericValue::decimal("0.1").unwrap(), &NumericValue::decimal("0.2").unwrap()).unwrap();
/// assert_eq!(sum.value.to_string(), "NumberDecimal(\"0.3\")");
/// ```
pub fn increment(current: &NumericValue, operand: &NumericValue) -> NumericResult<OperatorOutcome> {
    Increment::default().apply(current, operand)
}
