// ============================================================================
// Decimal128
// IEEE 754-2008 decimal128 value with exact (coefficient, exponent) storage
// ============================================================================
//
// A finite value is `(-1)^sign × coefficient × 10^exponent` where the
// coefficient holds at most 34 decimal digits. The pair is kept exactly as
// supplied, so "5.0" (50, -1) and "5.00" (500, -2) are different stored values
// that compare equal.
//
// Submodules:
// - text: parsing and scientific-string rendering
// - arith: add / subtract / multiply / divide / quantize with rounding
// - convert: integer, binary64 and rust_decimal conversions
// - encoding: canonical 128-bit BID encoding

mod arith;
mod convert;
mod encoding;
mod text;

pub use convert::DOUBLE_DISPLAY_DIGITS;
pub(crate) use convert::decompose_f64;

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use super::rounding::RoundingMode;

/// Maximum number of significant decimal digits in a coefficient.
pub const MAX_DIGITS: u32 = 34;

/// Smallest exponent of a finite value (applies to the coefficient's last digit).
pub const EXPONENT_MIN: i32 = -6176;

/// Largest exponent of a finite value.
pub const EXPONENT_MAX: i32 = 6111;

pub(crate) const EXPONENT_BIAS: i32 = 6176;

/// 10^34 - 1, the largest coefficient.
pub(crate) const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

/// Compute 10^n at compile time
const fn pow10(n: u32) -> u128 {
    let mut result: u128 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

const fn pow10_table() -> [u128; 39] {
    let mut table = [0u128; 39];
    let mut i = 0;
    while i < 39 {
        table[i] = pow10(i as u32);
        i += 1;
    }
    table
}

/// Powers of ten that fit in a u128 (10^0 ..= 10^38).
pub(crate) const POW10: [u128; 39] = pow10_table();

/// Number of decimal digits in `value` (1 for zero).
pub(crate) fn digit_count(value: u128) -> u32 {
    let mut digits = 1;
    while digits < 39 && value >= POW10[digits as usize] {
        digits += 1;
    }
    digits
}

/// `value × 10^shift` if it fits in a u128.
pub(crate) fn scale_u128(value: u128, shift: u32) -> Option<u128> {
    if value == 0 {
        return Some(0);
    }
    if shift as usize >= POW10.len() {
        return None;
    }
    value.checked_mul(POW10[shift as usize])
}

/// Divide `value` by 10^drop, rounding the quotient with `mode`.
///
/// Returns the rounded quotient and whether any non-zero digit was discarded.
pub(crate) fn shift_right_u128(
    value: u128,
    drop: u32,
    negative: bool,
    mode: RoundingMode,
) -> (u128, bool) {
    if drop == 0 || value == 0 {
        return (value, false);
    }
    let (quotient, half, nonzero) = if drop as usize >= POW10.len() {
        // Every digit goes and what remains is below half a unit.
        (0, Ordering::Less, true)
    } else {
        let divisor = POW10[drop as usize];
        let remainder = value % divisor;
        (
            value / divisor,
            (remainder * 2).cmp(&divisor),
            remainder != 0,
        )
    };
    let up = mode.rounds_up(negative, quotient % 2 == 1, half, nonzero);
    (if up { quotient + 1 } else { quotient }, nonzero)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Repr {
    Finite { coefficient: u128, exponent: i32 },
    Infinity,
    NaN,
}

/// Exact decimal floating-point number in the IEEE 754-2008 decimal128 format.
///
/// `PartialEq`/`Eq`/`Hash` compare the *stored* representation: `5.0 != 5.00`
/// and `0 != -0`. Use [`Decimal128::compare`] for numeric ordering.
///
/// # Example
/// ```
/// use numeric_engine::numeric::Decimal128;
///
/// let a = Decimal128::parse("5.0").unwrap();
/// let b = Decimal128::parse("5.00").unwrap();
/// assert_ne!(a, b);
/// assert_eq!(a.compare(&b), std::cmp::Ordering::Equal);
/// assert_eq!(b.to_text(), "5.00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    negative: bool,
    repr: Repr,
}

impl Decimal128 {
    // ========================================================================
    // Constants
    // ========================================================================

    /// Positive zero, `0`
    pub const ZERO: Self = Self::finite_unchecked(false, 0, 0);

    /// Negative zero, `-0`
    pub const NEG_ZERO: Self = Self::finite_unchecked(true, 0, 0);

    /// One, `1`
    pub const ONE: Self = Self::finite_unchecked(false, 1, 0);

    /// Largest finite value, `9999999999999999999999999999999999E+6111`
    pub const MAX: Self = Self::finite_unchecked(false, MAX_COEFFICIENT, EXPONENT_MAX);

    /// Most negative finite value
    pub const MIN: Self = Self::finite_unchecked(true, MAX_COEFFICIENT, EXPONENT_MAX);

    /// Smallest positive value, `1E-6176`
    pub const MIN_POSITIVE: Self = Self::finite_unchecked(false, 1, EXPONENT_MIN);

    pub const INFINITY: Self = Self {
        negative: false,
        repr: Repr::Infinity,
    };

    pub const NEG_INFINITY: Self = Self {
        negative: true,
        repr: Repr::Infinity,
    };

    /// Quiet NaN
    pub const NAN: Self = Self {
        negative: false,
        repr: Repr::NaN,
    };

    // ========================================================================
    // Construction
    // ========================================================================

    pub(crate) const fn finite_unchecked(negative: bool, coefficient: u128, exponent: i32) -> Self {
        Self {
            negative,
            repr: Repr::Finite {
                coefficient,
                exponent,
            },
        }
    }

    pub(crate) const fn infinity(negative: bool) -> Self {
        Self {
            negative,
            repr: Repr::Infinity,
        }
    }

    /// Create a finite value from its parts without any rounding.
    ///
    /// # Errors
    /// - `PrecisionLoss` if the coefficient has more than 34 digits
    /// - `Overflow` if the exponent is outside `EXPONENT_MIN..=EXPONENT_MAX`
    pub fn from_parts(
        negative: bool,
        coefficient: u128,
        exponent: i32,
    ) -> super::NumericResult<Self> {
        if coefficient > MAX_COEFFICIENT {
            return Err(super::NumericError::PrecisionLoss);
        }
        if !(EXPONENT_MIN..=EXPONENT_MAX).contains(&exponent) {
            return Err(super::NumericError::Overflow);
        }
        Ok(Self::finite_unchecked(negative, coefficient, exponent))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Sign, coefficient and exponent of a finite value; `None` for NaN and infinities.
    #[inline]
    pub fn parts(&self) -> Option<(bool, u128, i32)> {
        match self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => Some((self.negative, coefficient, exponent)),
            _ => None,
        }
    }

    /// Coefficient of a finite value (0 for NaN and infinities).
    #[inline]
    pub fn coefficient(&self) -> u128 {
        self.parts().map_or(0, |(_, c, _)| c)
    }

    /// Exponent of a finite value (0 for NaN and infinities).
    #[inline]
    pub fn exponent(&self) -> i32 {
        self.parts().map_or(0, |(_, _, e)| e)
    }

    /// Exponent of the most significant digit (`exponent + digits - 1`).
    pub fn adjusted_exponent(&self) -> i32 {
        match self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => exponent + digit_count(coefficient) as i32 - 1,
            _ => 0,
        }
    }

    /// Sign bit, also set on negative zero, negative infinity and negative NaN.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self.repr, Repr::Finite { coefficient: 0, .. })
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self.repr, Repr::NaN)
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self.repr, Repr::Infinity)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self.repr, Repr::Finite { .. })
    }

    /// Same value with the sign bit flipped.
    #[inline]
    pub const fn negate(self) -> Self {
        Self {
            negative: !self.negative,
            repr: self.repr,
        }
    }

    /// Same value with the sign bit cleared.
    #[inline]
    pub const fn abs(self) -> Self {
        Self {
            negative: false,
            repr: self.repr,
        }
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Compare by numeric value.
    ///
    /// Trailing zeros and the sign of zero are ignored. NaN is equal to NaN and
    /// less than every other value, giving the total order
    /// `NaN < -Inf < finite < +Inf`.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.repr, other.repr) {
            (Repr::NaN, Repr::NaN) => return Ordering::Equal,
            (Repr::NaN, _) => return Ordering::Less,
            (_, Repr::NaN) => return Ordering::Greater,
            _ => {},
        }

        let (lhs, rhs) = (self.signum(), other.signum());
        if lhs != rhs || lhs == 0 {
            return lhs.cmp(&rhs);
        }

        let magnitude = self.cmp_magnitude(other);
        if lhs < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// -1, 0 or 1; NaN is handled by the caller.
    fn signum(&self) -> i8 {
        match self.repr {
            Repr::Finite { coefficient: 0, .. } => 0,
            _ if self.negative => -1,
            _ => 1,
        }
    }

    /// Compare absolute values of two non-NaN, non-zero numbers.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.repr, other.repr) {
            (Repr::Infinity, Repr::Infinity) => Ordering::Equal,
            (Repr::Infinity, _) => Ordering::Greater,
            (_, Repr::Infinity) => Ordering::Less,
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
                let adjusted = self.adjusted_exponent().cmp(&other.adjusted_exponent());
                if adjusted != Ordering::Equal {
                    return adjusted;
                }
                // Same leading digit position: the operand with the larger exponent
                // has fewer digits, so scaling it stays within 34 digits.
                if ea >= eb {
                    (ca * POW10[(ea - eb) as usize]).cmp(&cb)
                } else {
                    ca.cmp(&(cb * POW10[(eb - ea) as usize]))
                }
            },
            _ => Ordering::Equal,
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for Decimal128 {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl Neg for Decimal128 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Finite {
                coefficient,
                exponent,
            } => write!(
                f,
                "Decimal128({}, coefficient={}, exponent={})",
                self, coefficient, exponent
            ),
            _ => write!(f, "Decimal128({})", self),
        }
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl std::str::FromStr for Decimal128 {
    type Err = super::NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal128 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal128 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
