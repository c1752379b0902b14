// ============================================================================
// Decimal128 Arithmetic
// Correctly rounded add, subtract, multiply, divide and quantize
// ============================================================================

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use super::{
    digit_count, scale_u128, shift_right_u128, Decimal128, Repr, EXPONENT_MAX, EXPONENT_MIN,
    MAX_COEFFICIENT, MAX_DIGITS, POW10,
};
use crate::numeric::errors::{NumericError, NumericResult};
use crate::numeric::rounding::{RoundingMode, Signals};

const LOG10_2: f64 = std::f64::consts::LOG10_2;

pub(crate) fn big_pow10(n: u32) -> BigUint {
    BigUint::from(10u32).pow(n)
}

/// Number of decimal digits in `value` (1 for zero).
pub(crate) fn big_digits(value: &BigUint) -> u32 {
    if value.is_zero() {
        return 1;
    }
    let bits = value.bits();
    let estimate = ((bits - 1) as f64 * LOG10_2) as u32 + 1;
    if *value >= big_pow10(estimate) {
        estimate + 1
    } else {
        estimate
    }
}

/// Divide by 10^drop and round; returns the quotient and whether anything
/// non-zero was discarded.
fn shift_right_rounded(
    value: &BigUint,
    drop: u32,
    negative: bool,
    mode: RoundingMode,
) -> (BigUint, bool) {
    if drop == 0 || value.is_zero() {
        return (value.clone(), false);
    }
    let (quotient, half, nonzero) = if drop > big_digits(value) {
        (BigUint::zero(), Ordering::Less, true)
    } else {
        let divisor = big_pow10(drop);
        let quotient = value / &divisor;
        let remainder = value % &divisor;
        let half = (&remainder * 2u32).cmp(&divisor);
        (quotient, half, !remainder.is_zero())
    };
    let odd = !(&quotient % 2u32).is_zero();
    if mode.rounds_up(negative, odd, half, nonzero) {
        (quotient + 1u32, nonzero)
    } else {
        (quotient, nonzero)
    }
}

/// Fit an exact `(-1)^negative × coefficient × 10^exponent` into `precision`
/// digits and the decimal128 exponent range.
///
/// Zero coefficients clamp their exponent silently. Non-zero values that
/// lose digits below `EXPONENT_MIN` raise `UNDERFLOW | INEXACT`; values too
/// large for the format raise `OVERFLOW | INEXACT` and become infinity or the
/// largest finite magnitude depending on `mode`.
pub(crate) fn round_to_format(
    negative: bool,
    coefficient: BigUint,
    exponent: i64,
    precision: u32,
    mode: RoundingMode,
) -> (Decimal128, Signals) {
    let mut signals = Signals::NONE;
    let mut coefficient = coefficient;
    let mut exponent = exponent;

    let digits = big_digits(&coefficient);
    if digits > precision {
        let drop = digits - precision;
        let (rounded, inexact) = shift_right_rounded(&coefficient, drop, negative, mode);
        coefficient = rounded;
        exponent += i64::from(drop);
        if inexact {
            signals |= Signals::INEXACT;
        }
        // 99..9 rounded up to 10^precision
        if coefficient == big_pow10(precision) {
            coefficient /= 10u32;
            exponent += 1;
        }
    }

    if exponent < i64::from(EXPONENT_MIN) {
        let drop = u32::try_from(i64::from(EXPONENT_MIN) - exponent).unwrap_or(u32::MAX);
        let (rounded, inexact) = shift_right_rounded(&coefficient, drop, negative, mode);
        coefficient = rounded;
        exponent = i64::from(EXPONENT_MIN);
        if inexact {
            signals |= Signals::INEXACT | Signals::UNDERFLOW;
        }
    }

    if exponent > i64::from(EXPONENT_MAX) {
        if !coefficient.is_zero() {
            let pad = exponent - i64::from(EXPONENT_MAX);
            if i64::from(big_digits(&coefficient)) + pad > i64::from(precision) {
                signals |= Signals::OVERFLOW | Signals::INEXACT;
                let value = if mode.overflows_to_infinity(negative) {
                    Decimal128::infinity(negative)
                } else {
                    Decimal128::finite_unchecked(
                        negative,
                        POW10[precision as usize] - 1,
                        EXPONENT_MAX,
                    )
                };
                return (value, signals);
            }
            coefficient *= big_pow10(pad as u32);
        }
        exponent = i64::from(EXPONENT_MAX);
    }

    debug_assert!(big_digits(&coefficient) <= precision);
    let coefficient = coefficient.to_u128().unwrap_or(MAX_COEFFICIENT);
    (
        Decimal128::finite_unchecked(negative, coefficient, exponent as i32),
        signals,
    )
}

/// `round_to_format` at full precision, skipping the wide path when the
/// value already fits.
fn round_u128(
    negative: bool,
    coefficient: u128,
    exponent: i64,
    mode: RoundingMode,
) -> (Decimal128, Signals) {
    let in_range = (i64::from(EXPONENT_MIN)..=i64::from(EXPONENT_MAX)).contains(&exponent);
    if coefficient <= MAX_COEFFICIENT && in_range {
        return (
            Decimal128::finite_unchecked(negative, coefficient, exponent as i32),
            Signals::NONE,
        );
    }
    round_to_format(
        negative,
        BigUint::from(coefficient),
        exponent,
        MAX_DIGITS,
        mode,
    )
}

/// Sign of an exact zero produced by adding operands of the given signs.
fn zero_sum_sign(lhs: bool, rhs: bool, mode: RoundingMode) -> bool {
    if lhs == rhs {
        lhs
    } else {
        mode == RoundingMode::TowardNegative
    }
}

impl Decimal128 {
    // ========================================================================
    // Addition and Subtraction
    // ========================================================================

    /// Sum rounded half-even to 34 digits.
    ///
    /// # Example
    /// ```
    /// use numeric_engine::numeric::Decimal128;
    ///
    /// let a = Decimal128::parse("1.00").unwrap();
    /// let b = Decimal128::parse("2.000").unwrap();
    /// assert_eq!(a.add(&b).to_text(), "3.000");
    /// ```
    pub fn add(&self, other: &Self) -> Self {
        self.add_signaling(other, RoundingMode::default()).0
    }

    /// Sum rounded with `mode`, together with the raised signals.
    ///
    /// The result exponent is the smaller of the operand exponents whenever
    /// the exact sum fits in 34 digits.
    pub fn add_signaling(&self, other: &Self, mode: RoundingMode) -> (Self, Signals) {
        match (self.repr, other.repr) {
            (Repr::NaN, _) => (*self, Signals::NONE),
            (_, Repr::NaN) => (*other, Signals::NONE),
            (Repr::Infinity, Repr::Infinity) => {
                if self.negative == other.negative {
                    (*self, Signals::NONE)
                } else {
                    (Self::NAN, Signals::INVALID)
                }
            },
            (Repr::Infinity, _) => (*self, Signals::NONE),
            (_, Repr::Infinity) => (*other, Signals::NONE),
            (
                Repr::Finite {
                    coefficient: ca,
                    exponent: ea,
                },
                Repr::Finite {
                    coefficient: cb,
                    exponent: eb,
                },
            ) => add_finite(
                (self.negative, ca, ea),
                (other.negative, cb, eb),
                mode,
            ),
        }
    }

    /// Difference rounded half-even to 34 digits.
    pub fn subtract(&self, other: &Self) -> Self {
        self.subtract_signaling(other, RoundingMode::default()).0
    }

    pub fn subtract_signaling(&self, other: &Self, mode: RoundingMode) -> (Self, Signals) {
        if other.is_nan() {
            return (*other, Signals::NONE);
        }
        self.add_signaling(&other.negate(), mode)
    }

    // ========================================================================
    // Multiplication
    // ========================================================================

    /// Product rounded half-even to 34 digits.
    pub fn multiply(&self, other: &Self) -> Self {
        self.multiply_signaling(other, RoundingMode::default()).0
    }

    /// Product rounded with `mode`. The exact result exponent is the sum of
    /// the operand exponents.
    pub fn multiply_signaling(&self, other: &Self, mode: RoundingMode) -> (Self, Signals) {
        let negative = self.negative != other.negative;
        match (self.repr, other.repr) {
            (Repr::NaN, _) => (*self, Signals::NONE),
            (_, Repr::NaN) => (*other, Signals::NONE),
            (Repr::Infinity, _) | (_, Repr::Infinity) => {
                if self.is_zero() || other.is_zero() {
                    (Self::NAN, Signals::INVALID)
                } else {
                    (Self::infinity(negative), Signals::NONE)
                }
            },
            (
                Repr::Finite {
                    coefficient: ca,
                    exponent: ea,
                },
                Repr::Finite {
                    coefficient: cb,
                    exponent: eb,
                },
            ) => {
                let exponent = i64::from(ea) + i64::from(eb);
                match ca.checked_mul(cb) {
                    Some(product) => round_u128(negative, product, exponent, mode),
                    None => round_to_format(
                        negative,
                        BigUint::from(ca) * BigUint::from(cb),
                        exponent,
                        MAX_DIGITS,
                        mode,
                    ),
                }
            },
        }
    }

    // ========================================================================
    // Division
    // ========================================================================

    /// Quotient rounded half-even to 34 digits.
    ///
    /// Dividing a non-zero value by zero yields a signed infinity; use
    /// [`Decimal128::checked_div`] to get an error instead.
    pub fn divide(&self, other: &Self) -> Self {
        self.divide_signaling(other, RoundingMode::default()).0
    }

    /// Quotient rounded with `mode`.
    ///
    /// Exact quotients use the exponent closest to `exponent(self) -
    /// exponent(other)`; inexact ones carry the full 34 digits.
    pub fn divide_signaling(&self, other: &Self, mode: RoundingMode) -> (Self, Signals) {
        let negative = self.negative != other.negative;
        match (self.repr, other.repr) {
            (Repr::NaN, _) => (*self, Signals::NONE),
            (_, Repr::NaN) => (*other, Signals::NONE),
            (Repr::Infinity, Repr::Infinity) => (Self::NAN, Signals::INVALID),
            (Repr::Infinity, _) => (Self::infinity(negative), Signals::NONE),
            (_, Repr::Infinity) => (
                Self::finite_unchecked(negative, 0, EXPONENT_MIN),
                Signals::NONE,
            ),
            (
                Repr::Finite {
                    coefficient: ca,
                    exponent: ea,
                },
                Repr::Finite {
                    coefficient: cb,
                    exponent: eb,
                },
            ) => {
                let ideal = i64::from(ea) - i64::from(eb);
                if cb == 0 {
                    return if ca == 0 {
                        (Self::NAN, Signals::INVALID)
                    } else {
                        (Self::infinity(negative), Signals::DIVIDE_BY_ZERO)
                    };
                }
                if ca == 0 {
                    return round_u128(negative, 0, ideal, mode);
                }
                divide_finite(negative, ca, cb, ideal, mode)
            },
        }
    }

    /// Quotient that reports division by zero as an error.
    ///
    /// # Errors
    /// Returns `NumericError::DivisionByZero` when `other` is a zero.
    pub fn checked_div(&self, other: &Self) -> NumericResult<Self> {
        if other.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(self.divide(other))
    }

    // ========================================================================
    // Quantize
    // ========================================================================

    /// Value rounded half-even to the exponent of `reference`.
    pub fn quantize(&self, reference: &Self) -> Self {
        self.quantize_signaling(reference, RoundingMode::default()).0
    }

    /// Value rescaled to the exponent of `reference`, rounding with `mode`.
    ///
    /// Raises `INVALID` (and returns NaN) when the rescaled coefficient would
    /// need more than 34 digits or exactly one operand is infinite.
    pub fn quantize_signaling(&self, reference: &Self, mode: RoundingMode) -> (Self, Signals) {
        let (coefficient, exponent, target) = match (self.repr, reference.repr) {
            (Repr::NaN, _) => return (*self, Signals::NONE),
            (_, Repr::NaN) => return (*reference, Signals::NONE),
            (Repr::Infinity, Repr::Infinity) => return (*self, Signals::NONE),
            (Repr::Infinity, _) | (_, Repr::Infinity) => return (Self::NAN, Signals::INVALID),
            (
                Repr::Finite {
                    coefficient,
                    exponent,
                },
                Repr::Finite {
                    exponent: target, ..
                },
            ) => (coefficient, exponent, target),
        };

        match exponent.cmp(&target) {
            Ordering::Equal => (*self, Signals::NONE),
            Ordering::Greater => {
                let shift = (exponent - target) as u32;
                match scale_u128(coefficient, shift) {
                    Some(scaled) if scaled <= MAX_COEFFICIENT => (
                        Self::finite_unchecked(self.negative, scaled, target),
                        Signals::NONE,
                    ),
                    _ => (Self::NAN, Signals::INVALID),
                }
            },
            Ordering::Less => {
                let drop = (target - exponent) as u32;
                let (rounded, inexact) =
                    shift_right_u128(coefficient, drop, self.negative, mode);
                let signals = if inexact {
                    Signals::INEXACT
                } else {
                    Signals::NONE
                };
                (
                    Self::finite_unchecked(self.negative, rounded, target),
                    signals,
                )
            },
        }
    }
}

fn add_finite(
    (na, ca, ea): (bool, u128, i32),
    (nb, cb, eb): (bool, u128, i32),
    mode: RoundingMode,
) -> (Decimal128, Signals) {
    let exponent = ea.min(eb);
    let shift_a = (ea - exponent) as u32;
    let shift_b = (eb - exponent) as u32;

    if let (Some(a), Some(b)) = (scale_u128(ca, shift_a), scale_u128(cb, shift_b)) {
        if na == nb {
            if let Some(sum) = a.checked_add(b) {
                return round_u128(na, sum, i64::from(exponent), mode);
            }
        } else {
            let (negative, magnitude) = match a.cmp(&b) {
                Ordering::Greater => (na, a - b),
                Ordering::Less => (nb, b - a),
                Ordering::Equal => (zero_sum_sign(na, nb, mode), 0),
            };
            return round_u128(negative, magnitude, i64::from(exponent), mode);
        }
    }

    let a = BigUint::from(ca) * big_pow10(shift_a);
    let b = BigUint::from(cb) * big_pow10(shift_b);
    let (negative, magnitude) = if na == nb {
        (na, a + b)
    } else {
        match a.cmp(&b) {
            Ordering::Greater => (na, a - b),
            Ordering::Less => (nb, b - a),
            Ordering::Equal => (zero_sum_sign(na, nb, mode), BigUint::zero()),
        }
    };
    round_to_format(negative, magnitude, i64::from(exponent), MAX_DIGITS, mode)
}

fn divide_finite(
    negative: bool,
    ca: u128,
    cb: u128,
    ideal: i64,
    mode: RoundingMode,
) -> (Decimal128, Signals) {
    // Enough extra digits for a 35 or 36 digit quotient.
    let shift = MAX_DIGITS + digit_count(cb) + 1 - digit_count(ca);
    let divisor = BigUint::from(cb);
    let numerator = BigUint::from(ca) * big_pow10(shift);
    let mut quotient = &numerator / &divisor;
    let remainder = &numerator % &divisor;
    let mut exponent = ideal - i64::from(shift);

    if remainder.is_zero() {
        while exponent < ideal && (&quotient % 10u32).is_zero() {
            quotient /= 10u32;
            exponent += 1;
        }
    } else {
        // Sticky digit so the discarded part is never mistaken for a tie.
        quotient = quotient * 10u32 + 1u32;
        exponent -= 1;
    }
    round_to_format(negative, quotient, exponent, MAX_DIGITS, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal128 {
        Decimal128::parse(s).unwrap()
    }

    #[test]
    fn test_big_digits() {
        assert_eq!(big_digits(&BigUint::zero()), 1);
        assert_eq!(big_digits(&BigUint::from(9u32)), 1);
        assert_eq!(big_digits(&BigUint::from(10u32)), 2);
        assert_eq!(big_digits(&big_pow10(34)), 35);
        assert_eq!(big_digits(&(big_pow10(100) - 1u32)), 100);
    }

    #[test]
    fn test_add() {
        assert_eq!(dec("25.05E20").add(&dec("-50.5218E19")).to_text(), "1.999782E+21");
        assert_eq!(dec("1.00").add(&dec("2.000")).to_text(), "3.000");
        assert_eq!(dec("0.1").add(&dec("0.2")).to_text(), "0.3");
        assert_eq!(dec("5").add(&dec("-5")).to_text(), "0");
    }

    #[test]
    fn test_add_zero_sign() {
        let (sum, _) = dec("0").add_signaling(&dec("-0"), RoundingMode::TiesToEven);
        assert!(!sum.is_negative());
        let (sum, _) = dec("0").add_signaling(&dec("-0"), RoundingMode::TowardNegative);
        assert!(sum.is_negative());
        let (sum, _) = dec("-0").add_signaling(&dec("-0.00"), RoundingMode::TiesToEven);
        assert_eq!(sum.to_text(), "-0.00");
    }

    #[test]
    fn test_subtract() {
        assert_eq!(
            dec("25.05E20").subtract(&dec("-50.5218E19")).to_text(),
            "3.010218E+21"
        );
        assert_eq!(dec("1.00").subtract(&dec("2.000")).to_text(), "-1.000");
    }

    #[test]
    fn test_add_rounds_far_operands() {
        let (result, signals) = Decimal128::MIN.subtract_signaling(&dec("1"), RoundingMode::TiesToEven);
        assert_eq!(result, Decimal128::MIN);
        assert!(signals.is_inexact());
        assert!(!signals.contains(Signals::OVERFLOW));

        let (result, signals) =
            dec("1E+40").add_signaling(&dec("1"), RoundingMode::TowardPositive);
        assert_eq!(result.to_text(), "1.000000000000000000000000000000001E+40");
        assert!(signals.is_inexact());
    }

    #[test]
    fn test_add_specials() {
        let (r, s) = Decimal128::INFINITY.add_signaling(&Decimal128::NEG_INFINITY, RoundingMode::TiesToEven);
        assert!(r.is_nan());
        assert!(s.contains(Signals::INVALID));
        assert_eq!(Decimal128::INFINITY.add(&dec("5")), Decimal128::INFINITY);
        assert!(dec("NaN").add(&dec("1")).is_nan());
        assert!(dec("1").add(&dec("-NaN")).is_negative());
    }

    #[test]
    fn test_multiply() {
        assert_eq!(
            dec("25.05E20").multiply(&dec("-50.5218E19")).to_text(),
            "-1.265571090E+42"
        );
        assert_eq!(dec("1.00").multiply(&dec("2.000")).to_text(), "2.00000");
        assert_eq!(
            dec("10201.01").multiply(&dec("1000000000000")).to_text(),
            "10201010000000000.00"
        );
        assert_eq!(dec("-2").multiply(&dec("0")).to_text(), "-0");
    }

    #[test]
    fn test_multiply_overflow() {
        let (r, s) = dec("2").multiply_signaling(&Decimal128::MAX, RoundingMode::TiesToEven);
        assert_eq!(r, Decimal128::INFINITY);
        assert!(s.contains(Signals::OVERFLOW | Signals::INEXACT));

        let (r, s) = dec("2").multiply_signaling(&Decimal128::MAX, RoundingMode::TowardZero);
        assert_eq!(r, Decimal128::MAX);
        assert!(s.contains(Signals::OVERFLOW));
    }

    #[test]
    fn test_multiply_underflow() {
        let (r, s) = Decimal128::MIN_POSITIVE.multiply_signaling(&dec("0.1"), RoundingMode::TiesToEven);
        assert!(r.is_zero());
        assert_eq!(r.exponent(), EXPONENT_MIN);
        assert!(s.contains(Signals::UNDERFLOW | Signals::INEXACT));
    }

    #[test]
    fn test_multiply_wide_coefficients() {
        let a = dec("9999999999999999999999999999999999");
        let (r, s) = a.multiply_signaling(&a, RoundingMode::TiesToEven);
        assert_eq!(r.to_text(), "9.999999999999999999999999999999998E+67");
        assert!(s.is_inexact());
    }

    #[test]
    fn test_multiply_infinity_by_zero() {
        let (r, s) = Decimal128::INFINITY.multiply_signaling(&dec("0"), RoundingMode::TiesToEven);
        assert!(r.is_nan());
        assert!(s.contains(Signals::INVALID));
        assert_eq!(Decimal128::INFINITY.multiply(&dec("-3")), Decimal128::NEG_INFINITY);
    }

    #[test]
    fn test_divide() {
        assert_eq!(
            dec("25.05E20").divide(&dec("-50.5218E19")).to_text(),
            "-4.958255644098191275845278671781290"
        );
        assert_eq!(dec("1.00").divide(&dec("2.000")).to_text(), "0.5");
        assert_eq!(dec("1").divide(&dec("3")).to_text(), "0.3333333333333333333333333333333333");
        assert_eq!(dec("2").divide(&dec("3")).to_text(), "0.6666666666666666666666666666666667");
        assert_eq!(dec("100").divide(&dec("4")).to_text(), "25");
        assert_eq!(dec("1E+3").divide(&dec("2")).to_text(), "5E+2");
        assert_eq!(dec("0.00").divide(&dec("5")).to_text(), "0.00");
    }

    #[test]
    fn test_divide_by_zero() {
        let (r, s) = dec("2").divide_signaling(&dec("0"), RoundingMode::TiesToEven);
        assert_eq!(r, Decimal128::INFINITY);
        assert!(s.contains(Signals::DIVIDE_BY_ZERO));

        let (r, s) = dec("0").divide_signaling(&dec("0"), RoundingMode::TiesToEven);
        assert!(r.is_nan());
        assert!(s.contains(Signals::INVALID));

        assert_eq!(dec("2").checked_div(&dec("-0.0")), Err(NumericError::DivisionByZero));
        assert_eq!(dec("2").checked_div(&dec("4")).unwrap().to_text(), "0.5");
    }

    #[test]
    fn test_divide_specials() {
        let (r, _) = dec("5").divide_signaling(&Decimal128::NEG_INFINITY, RoundingMode::TiesToEven);
        assert!(r.is_zero());
        assert!(r.is_negative());
        let (r, s) = Decimal128::INFINITY.divide_signaling(&Decimal128::INFINITY, RoundingMode::TiesToEven);
        assert!(r.is_nan());
        assert!(s.contains(Signals::INVALID));
    }

    #[test]
    fn test_quantize() {
        let (r, s) = dec("1.000008").quantize_signaling(&dec("0.00001"), RoundingMode::TiesToEven);
        assert_eq!(r.to_text(), "1.00001");
        assert!(s.is_inexact());

        assert_eq!(dec("2.5").quantize(&dec("1")).to_text(), "2");
        assert_eq!(dec("3.5").quantize(&dec("1")).to_text(), "4");
        assert_eq!(dec("5").quantize(&dec("0.00")).to_text(), "5.00");
        assert_eq!(dec("0").quantize(&dec("1E+10")).to_text(), "0E+10");

        let (r, s) = dec("-2.5").quantize_signaling(&dec("1"), RoundingMode::TowardNegative);
        assert_eq!(r.to_text(), "-3");
        assert!(s.is_inexact());
    }

    #[test]
    fn test_quantize_invalid() {
        let (r, s) = dec("1E+10").quantize_signaling(&dec("1E-30"), RoundingMode::TiesToEven);
        assert!(r.is_nan());
        assert!(s.contains(Signals::INVALID));

        let (r, s) = Decimal128::INFINITY.quantize_signaling(&dec("1"), RoundingMode::TiesToEven);
        assert!(r.is_nan());
        assert!(s.contains(Signals::INVALID));
    }
}
