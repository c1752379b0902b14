// ============================================================================
// Update Operator Interface
// Defines the contract for pluggable field update operators
// ============================================================================

use crate::numeric::{NumericResult, NumericValue, Signals};

/// Value produced by an update operator, with the signals raised on the way
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorOutcome {
    pub value: NumericValue,
    pub signals: Signals,
}

impl OperatorOutcome {
    /// Outcome of an exact computation
    pub fn exact(value: NumericValue) -> Self {
        Self {
            value,
            signals: Signals::NONE,
        }
    }

    pub fn with_signals(value: NumericValue, signals: Signals) -> Self {
        Self { value, signals }
    }

    /// True when the stored value is not the exact mathematical result
    pub fn precision_lost(&self) -> bool {
        self.signals.is_inexact()
    }
}

/// Strategy pattern interface for update operators
/// Implementations: Increment ($inc), Multiply ($mul), Bitwise ($bit)
pub trait UpdateOperator: Send + Sync {
    /// Combine the field's current value with the operand
    ///
    /// # Arguments
    /// * `current` - Value currently stored in the field
    /// * `operand` - Value supplied by the update
    ///
    /// # Returns
    /// The new field value, or the reason the update must be rejected
    fn apply(&self, current: &NumericValue, operand: &NumericValue) -> NumericResult<OperatorOutcome>;

    /// Value stored when the field does not exist yet
    fn value_for_missing_field(&self, operand: &NumericValue) -> NumericResult<NumericValue>;

    /// Operator name for logging and error messages (e.g. `$inc`)
    fn name(&self) -> &'static str;
}
