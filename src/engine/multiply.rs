// ============================================================================
// Multiply Operator ($mul)
// Multiplies the stored value by the operand
// ============================================================================

use super::promotion::{check_int64_overflow, finish, promote, Promoted};
use crate::domain::config::ArithmeticPolicy;
use crate::interfaces::{OperatorOutcome, UpdateOperator};
use crate::numeric::{Decimal128, NumericResult, NumericValue};

/// `$mul` under a given arithmetic policy
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply {
    policy: ArithmeticPolicy,
}

impl Multiply {
    pub fn new(policy: ArithmeticPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ArithmeticPolicy {
        &self.policy
    }
}

impl UpdateOperator for Multiply {
    fn apply(&self, current: &NumericValue, operand: &NumericValue) -> NumericResult<OperatorOutcome> {
        let policy = &self.policy;
        match promote(current, operand, policy) {
            Promoted::Int32(a, b) => Ok(OperatorOutcome::exact(match a.checked_mul(b) {
                Some(product) => NumericValue::Int32(product),
                // |i32| * |i32| < 2^62, always fits
                None => NumericValue::Int64(i64::from(a) * i64::from(b)),
            })),

            Promoted::Int64(a, b) => match a.checked_mul(b) {
                Some(product) => Ok(OperatorOutcome::exact(NumericValue::Int64(product))),
                None => {
                    check_int64_overflow(self.name(), policy)?;
                    let (product, signals) = Decimal128::from(a)
                        .multiply_signaling(&Decimal128::from(b), policy.rounding_mode);
                    finish(self.name(), NumericValue::Decimal128(product), signals, policy)
                },
            },

            // A finite decimal past the double range converts to infinity;
            // times zero it is still zero, not NaN.
            Promoted::Double(a, b, _)
                if (a == 0.0 || b == 0.0) && current.is_finite() && operand.is_finite() =>
            {
                let negative = a.is_sign_negative() != b.is_sign_negative();
                let zero = if negative { -0.0 } else { 0.0 };
                Ok(OperatorOutcome::exact(NumericValue::Double(zero)))
            },

            Promoted::Double(a, b, signals) => {
                finish(self.name(), NumericValue::Double(a * b), signals, policy)
            },

            Promoted::Decimal(a, b, conversion) => {
                let (product, signals) = a.multiply_signaling(&b, policy.rounding_mode);
                finish(
                    self.name(),
                    NumericValue::Decimal128(product),
                    conversion | signals,
                    policy,
                )
            },
        }
    }

    /// A missing field is created holding zero of the operand's kind.
    fn value_for_missing_field(&self, operand: &NumericValue) -> NumericResult<NumericValue> {
        Ok(NumericValue::zero_of(operand.kind()))
    }

    fn name(&self) -> &'static str {
        "$mul"
    }
}

/// `$mul` with the default arithmetic policy
pub fn multiply(current: &NumericValue, operand: &NumericValue) -> NumericResult<OperatorOutcome> {
    Multiply::default().apply(current, operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Int64OverflowPolicy;
    use crate::numeric::{values_equal, NumericError, NumericKind};

    fn dec(text: &str) -> NumericValue {
        NumericValue::decimal(text).unwrap()
    }

    #[test]
    fn test_integer_products() {
        assert_eq!(
            multiply(&NumericValue::Int32(6), &NumericValue::Int32(7)).unwrap().value,
            NumericValue::Int32(42)
        );
        assert_eq!(
            multiply(&NumericValue::Int32(i32::MAX), &NumericValue::Int32(2)).unwrap().value,
            NumericValue::Int64(i64::from(i32::MAX) * 2)
        );
        assert_eq!(
            multiply(&NumericValue::Int64(3), &NumericValue::Int32(-4)).unwrap().value,
            NumericValue::Int64(-12)
        );
    }

    #[test]
    fn test_int64_overflow() {
        assert_eq!(
            multiply(&NumericValue::Int64(i64::MAX), &NumericValue::Int64(2)),
            Err(NumericError::Overflow)
        );

        let op = Multiply::new(
            ArithmeticPolicy::default().with_int64_overflow(Int64OverflowPolicy::PromoteToDecimal),
        );
        let outcome = op
            .apply(&NumericValue::Int64(i64::MAX), &NumericValue::Int64(2))
            .unwrap();
        assert_eq!(outcome.value, dec("18446744073709551614"));
    }

    #[test]
    fn test_price_times_long() {
        let outcome = multiply(&dec("10201.01"), &NumericValue::long(1_000_000_000_000)).unwrap();
        assert_eq!(outcome.value.to_string(), "NumberDecimal(\"10201010000000000.00\")");
        assert!(!outcome.precision_lost());

        let outcome = multiply(&dec("10201.01"), &dec("1E12")).unwrap();
        assert_eq!(outcome.value.to_string(), "NumberDecimal(\"1.020101E+16\")");
    }

    #[test]
    fn test_double_operand_gives_double() {
        let outcome = multiply(&NumericValue::Int32(3), &NumericValue::Double(0.5)).unwrap();
        assert_eq!(outcome.value, NumericValue::Double(1.5));
    }

    #[test]
    fn test_multiply_by_zero_collapses() {
        let values = [
            NumericValue::Int32(-17),
            NumericValue::Int64(i64::MAX),
            NumericValue::Double(123.5),
            dec("-9.99E+100"),
        ];
        let zeros = [
            NumericValue::zero_of(NumericKind::Int32),
            NumericValue::zero_of(NumericKind::Int64),
            NumericValue::zero_of(NumericKind::Double),
            NumericValue::zero_of(NumericKind::Decimal128),
        ];
        for value in &values {
            for zero in &zeros {
                let outcome = multiply(value, zero).unwrap();
                assert!(outcome.value.is_zero(), "{} * {} = {}", value, zero, outcome.value);
                assert!(values_equal(&outcome.value, &NumericValue::Int32(0)));
            }
        }
    }

    #[test]
    fn test_zero_times_decimal_beyond_double_range() {
        let huge = dec("1E+400");
        let outcome = multiply(&huge, &NumericValue::Double(0.0)).unwrap();
        assert_eq!(outcome.value.kind(), NumericKind::Double);
        assert!(values_equal(&outcome.value, &NumericValue::Int32(0)));
        assert!(!outcome.precision_lost());

        let outcome = multiply(&NumericValue::Double(-0.0), &huge).unwrap();
        assert!(outcome.value.same_representation(&NumericValue::Double(-0.0)));

        let strict = Multiply::new(ArithmeticPolicy::default().with_strict_precision(true));
        assert!(strict.apply(&dec("-1E+400"), &NumericValue::Double(0.0)).is_ok());

        // A real infinity times zero is still NaN
        let outcome = multiply(&NumericValue::Double(f64::INFINITY), &NumericValue::Int32(0)).unwrap();
        assert!(outcome.value.is_nan());
    }

    #[test]
    fn test_multiply_by_one_keeps_value() {
        let outcome = multiply(&dec("1.00"), &NumericValue::Int32(1)).unwrap();
        assert_eq!(outcome.value, dec("1.00"));
    }

    #[test]
    fn test_missing_field_takes_zero_of_operand_kind() {
        let op = Multiply::default();
        assert_eq!(
            op.value_for_missing_field(&dec("2.5")).unwrap(),
            NumericValue::zero_of(NumericKind::Decimal128)
        );
        assert_eq!(
            op.value_for_missing_field(&NumericValue::Int64(9)).unwrap(),
            NumericValue::Int64(0)
        );
        assert_eq!(op.name(), "$mul");
    }
}
