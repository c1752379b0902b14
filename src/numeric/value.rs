// ============================================================================
// Numeric Value
// Closed variant over the four stored number kinds
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::compare::compare_long_to_double;
use super::decimal128::Decimal128;
use super::errors::NumericResult;
use super::rounding::{RoundingMode, Signals};

/// Kind of a [`NumericValue`], named the way type errors report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumericKind {
    Int32,
    Int64,
    Double,
    Decimal128,
}

impl NumericKind {
    pub const fn name(self) -> &'static str {
        match self {
            NumericKind::Int32 => "int",
            NumericKind::Int64 => "long",
            NumericKind::Double => "double",
            NumericKind::Decimal128 => "decimal",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A number stored in a document field.
///
/// Equality is representational: `Int32(5) != Int64(5)` and decimal `5.0 !=
/// 5.00`. Use [`crate::numeric::compare_values`] to compare by value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        try_from = "crate::numeric::extended_json::ExtendedJson",
        into = "crate::numeric::extended_json::ExtendedJson"
    )
)]
pub enum NumericValue {
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal128(Decimal128),
}

impl NumericValue {
    /// Decimal value parsed from text without rounding.
    ///
    /// # Example
    /// ```
    /// use numeric_engine::numeric::NumericValue;
    ///
    /// let price = NumericValue::decimal("10201.01").unwrap();
    /// assert_eq!(price.to_string(), "NumberDecimal(\"10201.01\")");
    /// ```
    pub fn decimal(text: &str) -> NumericResult<Self> {
        Ok(NumericValue::Decimal128(Decimal128::parse(text)?))
    }

    #[inline]
    pub const fn long(value: i64) -> Self {
        NumericValue::Int64(value)
    }

    #[inline]
    pub const fn kind(&self) -> NumericKind {
        match self {
            NumericValue::Int32(_) => NumericKind::Int32,
            NumericValue::Int64(_) => NumericKind::Int64,
            NumericValue::Double(_) => NumericKind::Double,
            NumericValue::Decimal128(_) => NumericKind::Decimal128,
        }
    }

    /// Zero of the given kind (`0`, `NumberLong(0)`, `0.0`, `NumberDecimal("0")`).
    pub const fn zero_of(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Int32 => NumericValue::Int32(0),
            NumericKind::Int64 => NumericValue::Int64(0),
            NumericKind::Double => NumericValue::Double(0.0),
            NumericKind::Decimal128 => NumericValue::Decimal128(Decimal128::ZERO),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            NumericValue::Int32(v) => *v == 0,
            NumericValue::Int64(v) => *v == 0,
            NumericValue::Double(v) => *v == 0.0,
            NumericValue::Decimal128(d) => d.is_zero(),
        }
    }

    pub fn is_nan(&self) -> bool {
        match self {
            NumericValue::Double(v) => v.is_nan(),
            NumericValue::Decimal128(d) => d.is_nan(),
            NumericValue::Int32(_) | NumericValue::Int64(_) => false,
        }
    }

    /// Neither NaN nor infinite in its own kind. A decimal beyond the double
    /// range is still finite.
    pub fn is_finite(&self) -> bool {
        match self {
            NumericValue::Double(v) => v.is_finite(),
            NumericValue::Decimal128(d) => d.is_finite(),
            NumericValue::Int32(_) | NumericValue::Int64(_) => true,
        }
    }

    /// Identical stored form: same kind, and doubles compared bit for bit so
    /// `-0.0` differs from `0.0` and a NaN matches itself.
    pub fn same_representation(&self, other: &NumericValue) -> bool {
        match (self, other) {
            (NumericValue::Double(a), NumericValue::Double(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Integer payload of an int or long.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericValue::Int32(v) => Some(i64::from(*v)),
            NumericValue::Int64(v) => Some(*v),
            NumericValue::Double(_) | NumericValue::Decimal128(_) => None,
        }
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Exact decimal form; see [`NumericValue::to_decimal128_signaling`].
    pub fn to_decimal128(&self) -> Decimal128 {
        self.to_decimal128_signaling().0
    }

    /// Decimal form together with `INEXACT` when a double needed more than 34
    /// digits.
    pub fn to_decimal128_signaling(&self) -> (Decimal128, Signals) {
        match self {
            NumericValue::Int32(v) => (Decimal128::from(*v), Signals::NONE),
            NumericValue::Int64(v) => (Decimal128::from(*v), Signals::NONE),
            NumericValue::Double(v) => Decimal128::from_f64_exact(*v, RoundingMode::TiesToEven),
            NumericValue::Decimal128(d) => (*d, Signals::NONE),
        }
    }

    /// Nearest double together with `INEXACT` when the value had to round.
    pub fn to_f64_signaling(&self) -> (f64, Signals) {
        match self {
            NumericValue::Int32(v) => (f64::from(*v), Signals::NONE),
            NumericValue::Int64(v) => {
                let converted = *v as f64;
                if compare_long_to_double(*v, converted).is_eq() {
                    (converted, Signals::NONE)
                } else {
                    (converted, Signals::INEXACT)
                }
            },
            NumericValue::Double(v) => (*v, Signals::NONE),
            NumericValue::Decimal128(d) => d.to_f64_signaling(),
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.to_f64_signaling().0
    }
}

impl From<i32> for NumericValue {
    fn from(value: i32) -> Self {
        NumericValue::Int32(value)
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue::Int64(value)
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Double(value)
    }
}

impl From<Decimal128> for NumericValue {
    fn from(value: Decimal128) -> Self {
        NumericValue::Decimal128(value)
    }
}

/// Shell notation: `5`, `NumberLong(5)`, `5.5`, `NumberDecimal("5.00")`.
impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Int32(v) => write!(f, "{}", v),
            NumericValue::Int64(v) => write!(f, "NumberLong({})", v),
            NumericValue::Double(v) if v.is_infinite() => {
                f.write_str(if *v < 0.0 { "-Infinity" } else { "Infinity" })
            },
            NumericValue::Double(v) => write!(f, "{}", v),
            NumericValue::Decimal128(d) => write!(f, "NumberDecimal(\"{}\")", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(NumericValue::Int32(1).kind().name(), "int");
        assert_eq!(NumericValue::long(1).kind().name(), "long");
        assert_eq!(NumericValue::Double(1.0).kind().to_string(), "double");
        assert_eq!(NumericValue::decimal("1").unwrap().kind().name(), "decimal");
    }

    #[test]
    fn test_display() {
        assert_eq!(NumericValue::Int32(5).to_string(), "5");
        assert_eq!(NumericValue::Int64(5).to_string(), "NumberLong(5)");
        assert_eq!(NumericValue::Double(5.5).to_string(), "5.5");
        assert_eq!(NumericValue::Double(5.0).to_string(), "5");
        assert_eq!(NumericValue::Double(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(
            NumericValue::decimal("5.00").unwrap().to_string(),
            "NumberDecimal(\"5.00\")"
        );
    }

    #[test]
    fn test_representational_equality() {
        assert_ne!(NumericValue::Int32(5), NumericValue::Int64(5));
        assert_ne!(
            NumericValue::decimal("5.0").unwrap(),
            NumericValue::decimal("5.00").unwrap()
        );
        assert_eq!(NumericValue::from(7i64), NumericValue::long(7));
    }

    #[test]
    fn test_same_representation() {
        let zero = NumericValue::Double(0.0);
        let neg_zero = NumericValue::Double(-0.0);
        assert_eq!(zero, neg_zero);
        assert!(!zero.same_representation(&neg_zero));

        let nan = NumericValue::Double(f64::NAN);
        assert_ne!(nan, nan);
        assert!(nan.same_representation(&nan));

        assert!(!NumericValue::Int32(5).same_representation(&NumericValue::Int64(5)));
        assert!(NumericValue::decimal("5.00")
            .unwrap()
            .same_representation(&NumericValue::decimal("5.00").unwrap()));
    }

    #[test]
    fn test_finiteness() {
        assert!(NumericValue::decimal("1E+400").unwrap().is_finite());
        assert!(NumericValue::Int64(i64::MIN).is_finite());
        assert!(!NumericValue::Double(f64::INFINITY).is_finite());
        assert!(!NumericValue::decimal("NaN").unwrap().is_finite());
    }

    #[test]
    fn test_zero_of() {
        for kind in [
            NumericKind::Int32,
            NumericKind::Int64,
            NumericKind::Double,
            NumericKind::Decimal128,
        ] {
            let zero = NumericValue::zero_of(kind);
            assert_eq!(zero.kind(), kind);
            assert!(zero.is_zero());
        }
    }

    #[test]
    fn test_to_f64_signaling() {
        assert_eq!(NumericValue::Int64(1 << 53).to_f64_signaling(), (9007199254740992.0, Signals::NONE));
        let (value, signals) = NumericValue::Int64((1 << 53) + 1).to_f64_signaling();
        assert_eq!(value, 9007199254740992.0);
        assert!(signals.is_inexact());
        let (_, signals) = NumericValue::decimal("0.1").unwrap().to_f64_signaling();
        assert!(signals.is_inexact());
    }

    #[test]
    fn test_to_decimal128_signaling() {
        let (d, signals) = NumericValue::Double(1.5).to_decimal128_signaling();
        assert_eq!(d.to_text(), "1.5");
        assert!(signals.is_empty());

        let (_, signals) = NumericValue::Double(0.1).to_decimal128_signaling();
        assert!(signals.is_inexact());

        assert!(NumericValue::Double(f64::NAN).to_decimal128().is_nan());
        assert_eq!(NumericValue::Int32(-3).as_i64(), Some(-3));
        assert_eq!(NumericValue::Double(3.0).as_i64(), None);
    }
}
