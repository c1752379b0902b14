// ============================================================================
// Decimal128 Conversions
// Integers, IEEE binary64 and rust_decimal interop
// ============================================================================

use std::cmp::Ordering;

use num_bigint::BigUint;
use rust_decimal::Decimal;

use super::arith::round_to_format;
use super::{
    digit_count, scale_u128, shift_right_u128, Decimal128, Repr, EXPONENT_MIN, MAX_DIGITS, POW10,
};
use crate::numeric::compare::compare_decimal_to_double;
use crate::numeric::errors::{NumericError, NumericResult};
use crate::numeric::rounding::{RoundingMode, Signals};

/// Significant digits kept by [`Decimal128::from_f64`].
pub const DOUBLE_DISPLAY_DIGITS: u32 = 15;

/// Largest scale supported by `rust_decimal`.
const RUST_DECIMAL_MAX_SCALE: i32 = 28;

/// 2^96 - 1, the largest `rust_decimal` mantissa.
const RUST_DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Split a finite double into `(negative, mantissa, exponent)` with
/// `|value| = mantissa × 2^exponent` and an odd mantissa (or zero).
pub(crate) fn decompose_f64(value: f64) -> (bool, u64, i32) {
    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);

    let (mantissa, exponent) = if exponent_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent_bits - 1075)
    };
    if mantissa == 0 {
        return (negative, 0, 0);
    }
    let trailing = mantissa.trailing_zeros();
    (negative, mantissa >> trailing, exponent + trailing as i32)
}

impl From<i32> for Decimal128 {
    fn from(value: i32) -> Self {
        Self::finite_unchecked(value < 0, u128::from(value.unsigned_abs()), 0)
    }
}

impl From<i64> for Decimal128 {
    fn from(value: i64) -> Self {
        Self::finite_unchecked(value < 0, u128::from(value.unsigned_abs()), 0)
    }
}

impl From<Decimal> for Decimal128 {
    /// Exact: a `rust_decimal` mantissa has at most 29 digits.
    fn from(value: Decimal) -> Self {
        Self::finite_unchecked(
            value.is_sign_negative(),
            value.mantissa().unsigned_abs(),
            -(value.scale() as i32),
        )
    }
}

impl TryFrom<Decimal128> for Decimal {
    type Error = NumericError;

    fn try_from(value: Decimal128) -> Result<Self, Self::Error> {
        let (negative, mut coefficient, mut exponent) =
            value.parts().ok_or(NumericError::InvalidInput)?;

        if exponent > 0 {
            coefficient = scale_u128(coefficient, exponent as u32).ok_or(NumericError::Overflow)?;
            exponent = 0;
        }
        while exponent < -RUST_DECIMAL_MAX_SCALE && coefficient % 10 == 0 && coefficient != 0 {
            coefficient /= 10;
            exponent += 1;
        }
        if exponent < -RUST_DECIMAL_MAX_SCALE {
            if coefficient != 0 {
                return Err(NumericError::PrecisionLoss);
            }
            exponent = -RUST_DECIMAL_MAX_SCALE;
        }
        if coefficient > RUST_DECIMAL_MAX_MANTISSA {
            return Err(NumericError::Overflow);
        }

        let mut decimal = Decimal::try_from_i128_with_scale(coefficient as i128, (-exponent) as u32)
            .map_err(|_| NumericError::Overflow)?;
        decimal.set_sign_negative(negative);
        Ok(decimal)
    }
}

impl Decimal128 {
    // ========================================================================
    // Integers
    // ========================================================================

    /// Round to an integer with `mode`; returns the value and whether
    /// rounding discarded anything.
    fn to_integer(&self, mode: RoundingMode) -> NumericResult<(i128, bool)> {
        let (negative, coefficient, exponent) = self.parts().ok_or(NumericError::InvalidInput)?;
        let (magnitude, inexact) = if exponent >= 0 {
            let scaled = scale_u128(coefficient, exponent as u32).ok_or(NumericError::Overflow)?;
            (scaled, false)
        } else {
            shift_right_u128(coefficient, exponent.unsigned_abs(), negative, mode)
        };
        if magnitude > u128::from(u64::MAX) {
            return Err(NumericError::Overflow);
        }
        let magnitude = magnitude as i128;
        Ok((if negative { -magnitude } else { magnitude }, inexact))
    }

    /// Round to an `i64` with `mode`.
    ///
    /// # Errors
    /// `InvalidInput` for NaN and infinities, `Overflow` outside the `i64` range.
    pub fn to_i64(&self, mode: RoundingMode) -> NumericResult<i64> {
        let (value, _) = self.to_integer(mode)?;
        i64::try_from(value).map_err(|_| NumericError::Overflow)
    }

    /// Convert to an `i64`, failing with `PrecisionLoss` if a fraction would be lost.
    pub fn to_i64_exact(&self) -> NumericResult<i64> {
        let (value, inexact) = self.to_integer(RoundingMode::TowardZero)?;
        if inexact {
            return Err(NumericError::PrecisionLoss);
        }
        i64::try_from(value).map_err(|_| NumericError::Overflow)
    }

    /// Round to an `i32` with `mode`.
    pub fn to_i32(&self, mode: RoundingMode) -> NumericResult<i32> {
        let (value, _) = self.to_integer(mode)?;
        i32::try_from(value).map_err(|_| NumericError::Overflow)
    }

    pub fn to_i32_exact(&self) -> NumericResult<i32> {
        let (value, inexact) = self.to_integer(RoundingMode::TowardZero)?;
        if inexact {
            return Err(NumericError::PrecisionLoss);
        }
        i32::try_from(value).map_err(|_| NumericError::Overflow)
    }

    // ========================================================================
    // Binary64
    // ========================================================================

    /// Nearest double, rounding half-even.
    pub fn to_f64(&self) -> f64 {
        self.to_f64_signaling().0
    }

    /// Nearest double together with `INEXACT`, `OVERFLOW` and `UNDERFLOW`.
    pub fn to_f64_signaling(&self) -> (f64, Signals) {
        let (negative, coefficient, exponent) = match self.repr {
            Repr::NaN => return (f64::NAN, Signals::NONE),
            Repr::Infinity if self.negative => return (f64::NEG_INFINITY, Signals::NONE),
            Repr::Infinity => return (f64::INFINITY, Signals::NONE),
            Repr::Finite {
                coefficient,
                exponent,
            } => (self.negative, coefficient, exponent),
        };

        // The standard library parser is correctly rounded.
        let sign = if negative { "-" } else { "" };
        let value = match format!("{}{}e{}", sign, coefficient, exponent).parse::<f64>() {
            Ok(value) => value,
            Err(_) => return (f64::NAN, Signals::INVALID),
        };

        if value.is_infinite() {
            return (value, Signals::OVERFLOW | Signals::INEXACT);
        }
        if coefficient != 0 && value == 0.0 {
            return (value, Signals::UNDERFLOW | Signals::INEXACT);
        }
        if compare_decimal_to_double(self, value) == Ordering::Equal {
            return (value, Signals::NONE);
        }
        let mut signals = Signals::INEXACT;
        if value.is_subnormal() {
            signals |= Signals::UNDERFLOW;
        }
        (value, signals)
    }

    /// Double rounded with `mode`, together with the conversion signals.
    ///
    /// # Example
    /// ```
    /// use numeric_engine::numeric::{Decimal128, RoundingMode};
    ///
    /// let tenth = Decimal128::parse("0.1").unwrap();
    /// let (down, _) = tenth.to_f64_with_mode(RoundingMode::TowardNegative);
    /// let (up, _) = tenth.to_f64_with_mode(RoundingMode::TowardPositive);
    /// assert!(down < up);
    /// assert_eq!(up, 0.1);
    /// ```
    pub fn to_f64_with_mode(&self, mode: RoundingMode) -> (f64, Signals) {
        let (nearest, signals) = self.to_f64_signaling();
        if !signals.is_inexact() || mode == RoundingMode::TiesToEven {
            return (nearest, signals);
        }

        let (lower, upper) = match compare_decimal_to_double(self, nearest) {
            Ordering::Greater => (nearest, nearest.next_up()),
            _ => (nearest.next_down(), nearest),
        };
        let toward_zero = if self.negative { upper } else { lower };
        let away_from_zero = if self.negative { lower } else { upper };

        let value = match mode {
            RoundingMode::TowardPositive => upper,
            RoundingMode::TowardNegative => lower,
            RoundingMode::TowardZero => toward_zero,
            RoundingMode::TiesToAway if self.is_midpoint_of(lower, upper) => away_from_zero,
            RoundingMode::TiesToAway | RoundingMode::TiesToEven => nearest,
        };

        let mut signals = Signals::INEXACT;
        if value.is_infinite() {
            signals |= Signals::OVERFLOW;
        } else if value == 0.0 || value.is_subnormal() {
            signals |= Signals::UNDERFLOW;
        }
        (value, signals)
    }

    /// Whether the magnitude sits exactly halfway between two adjacent
    /// finite doubles.
    fn is_midpoint_of(&self, lower: f64, upper: f64) -> bool {
        let Repr::Finite {
            coefficient,
            exponent,
        } = self.repr
        else {
            return false;
        };
        if !lower.is_finite() || !upper.is_finite() {
            return false;
        }

        // |lower| + |upper| == sum × 2^shared, midpoint == sum × 2^(shared - 1)
        let (_, low_mantissa, low_exponent) = decompose_f64(lower);
        let (_, high_mantissa, high_exponent) = decompose_f64(upper);
        let shared = low_exponent.min(high_exponent);
        let sum = (BigUint::from(low_mantissa) << (low_exponent - shared) as usize)
            + (BigUint::from(high_mantissa) << (high_exponent - shared) as usize);
        let binary_exponent = shared - 1;

        let mut decimal = BigUint::from(coefficient);
        let mut midpoint = sum;
        if exponent >= 0 {
            decimal *= BigUint::from(10u32).pow(exponent.unsigned_abs());
        } else {
            midpoint *= BigUint::from(10u32).pow(exponent.unsigned_abs());
        }
        if binary_exponent >= 0 {
            midpoint <<= binary_exponent as usize;
        } else {
            decimal <<= binary_exponent.unsigned_abs() as usize;
        }
        decimal == midpoint
    }

    /// Exact binary value of `value` rounded to 34 digits with `mode`.
    ///
    /// # Example
    /// ```
    /// use numeric_engine::numeric::{Decimal128, RoundingMode};
    ///
    /// let (d, signals) = Decimal128::from_f64_exact(0.5, RoundingMode::TiesToEven);
    /// assert_eq!(d.to_text(), "0.5");
    /// assert!(signals.is_empty());
    ///
    /// let (d, signals) = Decimal128::from_f64_exact(0.1, RoundingMode::TiesToEven);
    /// assert_eq!(d.to_text(), "0.1000000000000000055511151231257827");
    /// assert!(signals.is_inexact());
    /// ```
    pub fn from_f64_exact(value: f64, mode: RoundingMode) -> (Self, Signals) {
        Self::from_f64_with_precision(value, MAX_DIGITS, mode)
    }

    /// Shell display conversion: 15 significant digits, half-even, with the
    /// coefficient padded to exactly 15 digits.
    ///
    /// `from_f64(0.1)` is `0.100000000000000`.
    pub fn from_f64(value: f64) -> Self {
        let (decimal, _) =
            Self::from_f64_with_precision(value, DOUBLE_DISPLAY_DIGITS, RoundingMode::TiesToEven);
        decimal.pad_to_digits(DOUBLE_DISPLAY_DIGITS)
    }

    /// Binary value of `value` rounded to `precision` significant digits
    /// (clamped to `1..=34`).
    pub fn from_f64_with_precision(
        value: f64,
        precision: u32,
        mode: RoundingMode,
    ) -> (Self, Signals) {
        if value.is_nan() {
            return (Self::NAN, Signals::NONE);
        }
        if value.is_infinite() {
            return (Self::infinity(value < 0.0), Signals::NONE);
        }

        let precision = precision.clamp(1, MAX_DIGITS);
        let (negative, mantissa, exponent) = decompose_f64(value);
        if mantissa == 0 {
            return (Self::finite_unchecked(negative, 0, 0), Signals::NONE);
        }

        // m × 2^-k == m × 5^k × 10^-k
        let (coefficient, decimal_exponent) = if exponent >= 0 {
            (BigUint::from(mantissa) << exponent as usize, 0)
        } else {
            let k = exponent.unsigned_abs();
            (BigUint::from(mantissa) * BigUint::from(5u32).pow(k), exponent)
        };
        round_to_format(
            negative,
            coefficient,
            i64::from(decimal_exponent),
            precision,
            mode,
        )
    }

    /// Append trailing zeros until a non-zero coefficient has `digits` digits.
    fn pad_to_digits(self, digits: u32) -> Self {
        match self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } if coefficient != 0 => {
                let missing = digits.saturating_sub(digit_count(coefficient));
                let room = (exponent - EXPONENT_MIN) as u32;
                let pad = missing.min(room);
                Self::finite_unchecked(
                    self.negative,
                    coefficient * POW10[pad as usize],
                    exponent - pad as i32,
                )
            },
            _ => self,
        }
    }
}
