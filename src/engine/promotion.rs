// ============================================================================
// Type Promotion
// Picks the result kind of a binary arithmetic update
// ============================================================================

use crate::domain::config::{ArithmeticPolicy, Int64OverflowPolicy, MixedPrecedence};
use crate::interfaces::OperatorOutcome;
use crate::numeric::{Decimal128, NumericError, NumericResult, NumericValue, Signals};

/// Both operands converted to the kind the computation runs in
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Promoted {
    Int32(i32, i32),
    Int64(i64, i64),
    /// Signals raised while converting to double
    Double(f64, f64, Signals),
    /// Signals raised while converting to decimal
    Decimal(Decimal128, Decimal128, Signals),
}

/// Promotion table for `$inc` and `$mul`
///
/// | current \ operand | int    | long   | double | decimal |
/// |-------------------|--------|--------|--------|---------|
/// | int               | int    | long   | double | decimal |
/// | long              | long   | long   | double | decimal |
/// | double            | double | double | double | (*)     |
/// | decimal           | decimal| decimal| (*)    | decimal |
///
/// (*) double under `MixedPrecedence::DoubleWins`, decimal under `DecimalWins`.
pub(crate) fn promote(current: &NumericValue, operand: &NumericValue, policy: &ArithmeticPolicy) -> Promoted {
    match (current, operand) {
        (NumericValue::Int32(a), NumericValue::Int32(b)) => Promoted::Int32(*a, *b),
        (NumericValue::Int32(a), NumericValue::Int64(b)) => Promoted::Int64(i64::from(*a), *b),
        (NumericValue::Int64(a), NumericValue::Int32(b)) => Promoted::Int64(*a, i64::from(*b)),
        (NumericValue::Int64(a), NumericValue::Int64(b)) => Promoted::Int64(*a, *b),
        (NumericValue::Decimal128(_), NumericValue::Double(_))
        | (NumericValue::Double(_), NumericValue::Decimal128(_))
            if policy.mixed_precedence == MixedPrecedence::DecimalWins =>
        {
            as_decimals(current, operand)
        },
        (NumericValue::Double(_), _) | (_, NumericValue::Double(_)) => as_doubles(current, operand),
        (NumericValue::Decimal128(_), _) | (_, NumericValue::Decimal128(_)) => {
            as_decimals(current, operand)
        },
    }
}

fn as_doubles(current: &NumericValue, operand: &NumericValue) -> Promoted {
    let (a, sa) = current.to_f64_signaling();
    let (b, sb) = operand.to_f64_signaling();
    Promoted::Double(a, b, sa | sb)
}

fn as_decimals(current: &NumericValue, operand: &NumericValue) -> Promoted {
    let (a, sa) = current.to_decimal128_signaling();
    let (b, sb) = operand.to_decimal128_signaling();
    Promoted::Decimal(a, b, sa | sb)
}

/// Gate for a 64-bit integer result that left the i64 range.
///
/// Returns `Ok` when the policy allows recomputing the result as a decimal.
pub(crate) fn check_int64_overflow(operator: &'static str, policy: &ArithmeticPolicy) -> NumericResult<()> {
    match policy.int64_overflow {
        Int64OverflowPolicy::Fail => {
            tracing::warn!(operator, "64-bit integer overflow, update rejected");
            Err(NumericError::Overflow)
        },
        Int64OverflowPolicy::PromoteToDecimal => {
            tracing::debug!(operator, "64-bit integer overflow, promoting to decimal");
            Ok(())
        },
    }
}

/// Wraps a computed value, enforcing `strict_precision` on rounded results.
pub(crate) fn finish(
    operator: &'static str,
    value: NumericValue,
    signals: Signals,
    policy: &ArithmeticPolicy,
) -> NumericResult<OperatorOutcome> {
    if signals.is_inexact() {
        if policy.strict_precision {
            tracing::warn!(operator, %value, "Rounded result rejected");
            return Err(NumericError::PrecisionLoss);
        }
        tracing::debug!(operator, %value, "Result rounded");
    }
    Ok(OperatorOutcome::with_signals(value, signals))
}
