// ============================================================================
// Cross-Kind Comparison
// Total order over int, long, double and decimal by mathematical value
// ============================================================================
//
// No comparison rounds. Integers are compared as integers, integer/double
// pairs use the 2^53 split, and decimal/double pairs compare the decimal
// against the exact binary value of the double.

use std::cmp::Ordering;

use num_bigint::BigUint;

use super::decimal128::{decompose_f64, Decimal128};
use super::value::NumericValue;

/// 2^53: every integer of at most this magnitude is exactly a double.
const DOUBLE_EXACT_LIMIT: u64 = 1 << 53;

/// 2^63 as a double; the first double above every `i64`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Compare two numeric values of any kinds.
///
/// NaN (double or decimal) equals NaN and sorts below every number, including
/// negative infinity. Positive and negative zero are equal.
///
/// # Example
/// ```
/// use numeric_engine::numeric::{compare_values, NumericValue};
/// use std::cmp::Ordering;
///
/// let five = NumericValue::Int32(5);
/// let decimal = NumericValue::decimal("5.00").unwrap();
/// assert_eq!(compare_values(&five, &decimal), Ordering::Equal);
///
/// // The double nearest 0.1 is slightly above one tenth.
/// let tenth = NumericValue::decimal("0.1").unwrap();
/// assert_eq!(compare_values(&tenth, &NumericValue::Double(0.1)), Ordering::Less);
/// ```
pub fn compare_values(a: &NumericValue, b: &NumericValue) -> Ordering {
    use NumericValue::{Decimal128 as Dec, Double};

    match (a, b) {
        (Double(x), Double(y)) => compare_doubles(*x, *y),
        (Dec(x), Dec(y)) => x.compare(y),
        (Dec(x), Double(y)) => compare_decimal_to_double(x, *y),
        (Double(x), Dec(y)) => compare_decimal_to_double(y, *x).reverse(),
        (Dec(x), other) => x.compare(&other.to_decimal128()),
        (other, Dec(y)) => other.to_decimal128().compare(y),
        (Double(x), other) => compare_long_to_double(integer_of(other), *x).reverse(),
        (other, Double(y)) => compare_long_to_double(integer_of(other), *y),
        (x, y) => integer_of(x).cmp(&integer_of(y)),
    }
}

/// True when `a` and `b` are mathematically equal.
pub fn values_equal(a: &NumericValue, b: &NumericValue) -> bool {
    compare_values(a, b) == Ordering::Equal
}

/// Exact decimal form of a value; doubles keep their full binary value,
/// rounded half-even only if it needs more than 34 digits.
pub fn to_decimal128(value: &NumericValue) -> Decimal128 {
    value.to_decimal128()
}

fn integer_of(value: &NumericValue) -> i64 {
    match value {
        NumericValue::Int32(v) => i64::from(*v),
        NumericValue::Int64(v) => *v,
        NumericValue::Double(_) | NumericValue::Decimal128(_) => 0,
    }
}

pub(crate) fn compare_doubles(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

/// Exact `i64` against `f64`.
pub(crate) fn compare_long_to_double(lhs: i64, rhs: f64) -> Ordering {
    if rhs.is_nan() {
        return Ordering::Greater;
    }
    if lhs.unsigned_abs() <= DOUBLE_EXACT_LIMIT {
        return compare_doubles(lhs as f64, rhs);
    }
    if rhs >= TWO_POW_63 {
        return Ordering::Less;
    }
    if rhs < -TWO_POW_63 {
        return Ordering::Greater;
    }
    // |lhs| > 2^53: a double this large is integral, a smaller one truncates
    // without changing the outcome.
    lhs.cmp(&(rhs as i64))
}

/// Exact decimal against the binary value of a double.
pub(crate) fn compare_decimal_to_double(decimal: &Decimal128, double: f64) -> Ordering {
    match (decimal.is_nan(), double.is_nan()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {},
    }
    if double.is_infinite() {
        let bound = if double < 0.0 {
            Decimal128::NEG_INFINITY
        } else {
            Decimal128::INFINITY
        };
        return decimal.compare(&bound);
    }
    let Some((negative, coefficient, exponent)) = decimal.parts() else {
        // Infinite decimal against a finite double
        return if decimal.is_negative() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    };

    let lhs_sign = signum(negative, coefficient == 0);
    let rhs_sign = signum(double < 0.0, double == 0.0);
    if lhs_sign != rhs_sign || lhs_sign == 0 {
        return lhs_sign.cmp(&rhs_sign);
    }

    let magnitude = compare_magnitudes(coefficient, exponent, decimal.adjusted_exponent(), double);
    if negative {
        magnitude.reverse()
    } else {
        magnitude
    }
}

fn signum(negative: bool, zero: bool) -> i8 {
    match (zero, negative) {
        (true, _) => 0,
        (false, true) => -1,
        (false, false) => 1,
    }
}

/// `coefficient × 10^exponent` against `|double|`, both non-zero.
fn compare_magnitudes(coefficient: u128, exponent: i32, adjusted: i32, double: f64) -> Ordering {
    // log10 is within one of the true decade, so a gap of two decides.
    let decade = double.abs().log10().floor() as i32;
    if adjusted >= decade + 2 {
        return Ordering::Greater;
    }
    if adjusted <= decade - 2 {
        return Ordering::Less;
    }

    let (_, mantissa, binary_exponent) = decompose_f64(double);
    let mut lhs = BigUint::from(coefficient);
    let mut rhs = BigUint::from(mantissa);
    if exponent >= 0 {
        lhs *= BigUint::from(10u32).pow(exponent.unsigned_abs());
    } else {
        rhs *= BigUint::from(10u32).pow(exponent.unsigned_abs());
    }
    if binary_exponent >= 0 {
        rhs <<= binary_exponent as usize;
    } else {
        lhs <<= binary_exponent.unsigned_abs() as usize;
    }
    lhs.cmp(&rhs)
}
