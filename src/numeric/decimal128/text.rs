// ============================================================================
// Decimal128 Text Conversion
// Parsing from and rendering to scientific strings
// ============================================================================

use arrayvec::ArrayVec;
use num_bigint::BigUint;
use smallvec::SmallVec;

use super::arith::round_to_format;
use super::{Decimal128, Repr, MAX_DIGITS};
use crate::numeric::errors::{NumericResult, ParseErrorKind};
use crate::numeric::rounding::{RoundingMode, Signals};

/// Explicit exponents are saturated here; anything this large over- or
/// underflows regardless of the coefficient.
const EXPONENT_SATURATION: i64 = 1_000_000_000;

/// ASCII digits of a coefficient, most significant first.
fn coefficient_digits(mut coefficient: u128) -> ArrayVec<u8, 34> {
    let mut digits = ArrayVec::new();
    loop {
        digits.push(b'0' + (coefficient % 10) as u8);
        coefficient /= 10;
        if coefficient == 0 || digits.is_full() {
            break;
        }
    }
    digits.reverse();
    digits
}

impl Decimal128 {
    /// Parse a decimal string without rounding.
    ///
    /// Accepts an optional sign, digits with an optional decimal point, and an
    /// optional `e`/`E` exponent, as well as `Inf`, `Infinity` and `NaN` in any
    /// case. The stored exponent is `explicit exponent - digits after the point`,
    /// so trailing zeros are kept: `"5.00"` is stored as `(500, -2)`.
    ///
    /// # Errors
    /// Returns `NumericError::Parse` for malformed input, for more than 34
    /// significant digits, and for exponents that cannot be represented.
    ///
    /// # Example
    /// ```
    /// use numeric_engine::numeric::Decimal128;
    ///
    /// let d = Decimal128::parse("-2087.015E-281").unwrap();
    /// assert_eq!(d.to_text(), "-2.087015E-278");
    /// assert!(Decimal128::parse("1.2.3").is_err());
    /// ```
    pub fn parse(text: &str) -> NumericResult<Self> {
        let (value, signals) = Self::parse_rounded(text, RoundingMode::TiesToEven)?;
        if signals.contains(Signals::OVERFLOW) || signals.contains(Signals::UNDERFLOW) {
            return Err(ParseErrorKind::ExponentOutOfRange.into());
        }
        if signals.is_inexact() {
            return Err(ParseErrorKind::TooManyDigits.into());
        }
        Ok(value)
    }

    /// Parse a decimal string, rounding coefficients longer than 34 digits and
    /// out-of-range exponents with `mode`.
    ///
    /// The returned signals report `INEXACT`, `OVERFLOW` and `UNDERFLOW`.
    pub fn parse_rounded(text: &str, mode: RoundingMode) -> NumericResult<(Self, Signals)> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseErrorKind::Empty.into());
        }

        let bytes = text.as_bytes();
        let mut pos = 0;
        let mut negative = false;
        if matches!(bytes[0], b'+' | b'-') {
            negative = bytes[0] == b'-';
            pos = 1;
            if matches!(bytes.get(1), Some(b'+' | b'-')) {
                return Err(ParseErrorKind::MultipleSigns.into());
            }
        }

        let body = &text[pos..];
        if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
            return Ok((Self::infinity(negative), Signals::NONE));
        }
        if body.eq_ignore_ascii_case("nan") {
            return Ok((Self::NAN.with_sign(negative), Signals::NONE));
        }

        // Significant digits only: leading zeros are dropped.
        let mut digits: SmallVec<[u8; 64]> = SmallVec::new();
        let mut seen_digit = false;
        let mut seen_point = false;
        let mut fraction_digits: i64 = 0;
        let mut explicit_exponent: i64 = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b @ b'0'..=b'9' => {
                    seen_digit = true;
                    if !(digits.is_empty() && b == b'0') {
                        digits.push(b - b'0');
                    }
                    if seen_point {
                        fraction_digits += 1;
                    }
                },
                b'.' if !seen_point => seen_point = true,
                b'e' | b'E' => {
                    explicit_exponent = parse_exponent(&bytes[pos + 1..])?;
                    break;
                },
                b'+' | b'-' if !seen_digit && !seen_point => {
                    return Err(ParseErrorKind::MultipleSigns.into());
                },
                _ => return Err(ParseErrorKind::InvalidCharacter.into()),
            }
            pos += 1;
        }

        if !seen_digit {
            return Err(ParseErrorKind::MissingDigits.into());
        }

        let exponent = explicit_exponent - fraction_digits;
        let coefficient = if digits.len() <= 38 {
            BigUint::from(
                digits
                    .iter()
                    .fold(0u128, |acc, &d| acc * 10 + u128::from(d)),
            )
        } else {
            BigUint::from_radix_be(digits.as_slice(), 10).ok_or(ParseErrorKind::InvalidCharacter)?
        };

        Ok(round_to_format(
            negative,
            coefficient,
            exponent,
            MAX_DIGITS,
            mode,
        ))
    }

    /// Render as a scientific string.
    ///
    /// Plain notation is used when the exponent is not positive and the
    /// adjusted exponent is at least -6; otherwise one digit is placed before
    /// the point followed by `E` and a signed exponent. Trailing zeros are
    /// always kept, so `parse(to_text(x))` reproduces `x` exactly.
    pub fn to_text(&self) -> String {
        let (coefficient, exponent) = match self.repr {
            Repr::NaN => return (if self.negative { "-NaN" } else { "NaN" }).to_string(),
            Repr::Infinity => {
                return (if self.negative { "-Infinity" } else { "Infinity" }).to_string()
            },
            Repr::Finite {
                coefficient,
                exponent,
            } => (coefficient, exponent as i64),
        };

        let digits = coefficient_digits(coefficient);
        let count = digits.len() as i64;
        let adjusted = exponent + count - 1;

        let mut out = String::with_capacity(count as usize + 8);
        if self.negative {
            out.push('-');
        }

        if exponent <= 0 && adjusted >= -6 {
            let integer_digits = count + exponent;
            if exponent == 0 {
                out.extend(digits.iter().map(|&d| d as char));
            } else if integer_digits > 0 {
                let split = integer_digits as usize;
                out.extend(digits[..split].iter().map(|&d| d as char));
                out.push('.');
                out.extend(digits[split..].iter().map(|&d| d as char));
            } else {
                out.push_str("0.");
                out.extend(std::iter::repeat('0').take((-integer_digits) as usize));
                out.extend(digits.iter().map(|&d| d as char));
            }
        } else {
            out.push(digits[0] as char);
            if count > 1 {
                out.push('.');
                out.extend(digits[1..].iter().map(|&d| d as char));
            }
            out.push('E');
            if adjusted >= 0 {
                out.push('+');
            }
            out.push_str(&adjusted.to_string());
        }
        out
    }

    pub(super) const fn with_sign(self, negative: bool) -> Self {
        Self {
            negative,
            repr: self.repr,
        }
    }
}

/// Parse the text following an exponent marker.
fn parse_exponent(bytes: &[u8]) -> Result<i64, ParseErrorKind> {
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(ParseErrorKind::InvalidExponent);
    }

    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(ParseErrorKind::InvalidExponent);
        }
        value = (value * 10 + i64::from(b - b'0')).min(EXPONENT_SATURATION);
    }
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;

    fn render(s: &str) -> String {
        Decimal128::parse(s).unwrap().to_text()
    }

    fn parse_err(s: &str) -> ParseErrorKind {
        match Decimal128::parse(s) {
            Err(NumericError::Parse(kind)) => kind,
            other => panic!("expected parse error for {:?}, got {:?}", s, other),
        }
    }

    #[test]
    fn test_parse_parts() {
        let d = Decimal128::parse("+2.010").unwrap();
        assert_eq!(d.parts(), Some((false, 2010, -3)));

        let d = Decimal128::parse("10201.01").unwrap();
        assert_eq!(d.parts(), Some((false, 1020101, -2)));

        let d = Decimal128::parse("-.005").unwrap();
        assert_eq!(d.parts(), Some((true, 5, -3)));

        let d = Decimal128::parse("1E12").unwrap();
        assert_eq!(d.parts(), Some((false, 1, 12)));

        let d = Decimal128::parse("12.5e-3").unwrap();
        assert_eq!(d.parts(), Some((false, 125, -4)));
    }

    #[test]
    fn test_render_plain() {
        assert_eq!(render("0"), "0");
        assert_eq!(render("0.0"), "0.0");
        assert_eq!(render("0.00"), "0.00");
        assert_eq!(render("000.0"), "0.0");
        assert_eq!(render("1234567890.1234567890"), "1234567890.1234567890");
        assert_eq!(render("5.00"), "5.00");
        assert_eq!(render("50.0"), "50.0");
        assert_eq!(render("5"), "5");
        assert_eq!(render("-50"), "-50");
        assert_eq!(render(".05"), "0.05");
        assert_eq!(render(".5"), "0.5");
        assert_eq!(render(".0052"), "0.0052");
        assert_eq!(render("-.005"), "-0.005");
        assert_eq!(render("1234567890123"), "1234567890123");
        assert_eq!(render("-0"), "-0");
    }

    #[test]
    fn test_render_scientific() {
        assert_eq!(render("0.000000000000"), "0E-12");
        assert_eq!(render("2087.015E+281"), "2.087015E+284");
        assert_eq!(render("-2087.015E-281"), "-2.087015E-278");
        assert_eq!(render(".000005123123123123"), "0.000005123123123123");
        assert_eq!(render(".0000000512"), "5.12E-8");
        assert_eq!(render(".012587E-200"), "1.2587E-202");
        assert_eq!(render("10201.01E14"), "1.020101E+18");
        assert_eq!(render("1E12"), "1E+12");
        assert_eq!(
            render("1234567890123456789012345678901234E0"),
            "1234567890123456789012345678901234"
        );
        assert_eq!(render("5E3"), "5E+3");
    }

    #[test]
    fn test_render_specials() {
        assert_eq!(render("+NaN"), "NaN");
        assert_eq!(render("-NaN"), "-NaN");
        assert_eq!(render("+Infinity"), "Infinity");
        assert_eq!(render("-INFINITY"), "-Infinity");
        assert_eq!(render("inf"), "Infinity");
    }

    #[test]
    fn test_round_trip_preserves_scale() {
        for s in [
            "5.00",
            "0E-12",
            "-2.087015E-278",
            "1.020101E+18",
            "10201010000000000.00",
            "0.000001",
            "1E+6111",
            "-0.0",
            "9.999999999999999999999999999999999E+6144",
        ] {
            let d = Decimal128::parse(s).unwrap();
            assert_eq!(d.to_text(), s);
            assert_eq!(Decimal128::parse(&d.to_text()).unwrap(), d);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_err(""), ParseErrorKind::Empty);
        assert_eq!(parse_err("   "), ParseErrorKind::Empty);
        assert_eq!(parse_err("--5"), ParseErrorKind::MultipleSigns);
        assert_eq!(parse_err("+-5"), ParseErrorKind::MultipleSigns);
        assert_eq!(parse_err("I am not a number!"), ParseErrorKind::InvalidCharacter);
        assert_eq!(parse_err("1.2.3"), ParseErrorKind::InvalidCharacter);
        assert_eq!(parse_err("5-3"), ParseErrorKind::InvalidCharacter);
        assert_eq!(parse_err("."), ParseErrorKind::MissingDigits);
        assert_eq!(parse_err("-E5"), ParseErrorKind::MissingDigits);
        assert_eq!(parse_err("1E"), ParseErrorKind::InvalidExponent);
        assert_eq!(parse_err("1E+x"), ParseErrorKind::InvalidExponent);
        assert_eq!(
            parse_err("12345678901234567890123456789012345"),
            ParseErrorKind::TooManyDigits
        );
        assert_eq!(parse_err("1E9999999999"), ParseErrorKind::ExponentOutOfRange);
        assert_eq!(parse_err("1E-9999"), ParseErrorKind::ExponentOutOfRange);
    }

    #[test]
    fn test_parse_long_but_exact() {
        // Trailing zeros beyond 34 digits are absorbed into the exponent.
        let d = Decimal128::parse("1000000000000000000000000000000000000").unwrap();
        assert_eq!(d.parts(), Some((false, POW10_33, 3)));
        assert_eq!(d.compare(&Decimal128::parse("1E36").unwrap()), std::cmp::Ordering::Equal);

        // Leading zeros are not significant.
        let d = Decimal128::parse("0000000000000000000000000000000000000012.5").unwrap();
        assert_eq!(d.parts(), Some((false, 125, -1)));
    }

    #[test]
    fn test_parse_more_digits_than_inline_buffer() {
        let text = format!("1{}", "0".repeat(69));
        let d = Decimal128::parse(&text).unwrap();
        assert_eq!(d.parts(), Some((false, POW10_33, 36)));

        let (d, signals) =
            Decimal128::parse_rounded(&"1234567890".repeat(7), RoundingMode::TiesToEven).unwrap();
        assert!(signals.is_inexact());
        assert_eq!(d.to_text(), "1.234567890123456789012345678901235E+69");
    }

    const POW10_33: u128 = super::super::POW10[33];

    #[test]
    fn test_parse_rounded() {
        let (d, signals) = Decimal128::parse_rounded(
            "12345678901234567890123456789012345",
            RoundingMode::TiesToEven,
        )
        .unwrap();
        assert!(signals.is_inexact());
        assert_eq!(d.to_text(), "1.234567890123456789012345678901234E+34");

        let (d, signals) = Decimal128::parse_rounded(
            "12345678901234567890123456789012345",
            RoundingMode::TowardPositive,
        )
        .unwrap();
        assert!(signals.is_inexact());
        assert_eq!(d.to_text(), "1.234567890123456789012345678901235E+34");

        let (d, signals) =
            Decimal128::parse_rounded("200E9999999999", RoundingMode::TiesToEven).unwrap();
        assert!(d.is_infinite());
        assert!(signals.contains(Signals::OVERFLOW));

        let (d, signals) =
            Decimal128::parse_rounded("-200E9999999999", RoundingMode::TiesToEven).unwrap();
        assert_eq!(d, Decimal128::NEG_INFINITY);
        assert!(signals.contains(Signals::OVERFLOW));
    }

    #[test]
    fn test_from_str_trait() {
        let d: Decimal128 = "123.456".parse().unwrap();
        assert_eq!(d.parts(), Some((false, 123456, -3)));
        let bad: Result<Decimal128, _> = "not_a_number".parse();
        assert!(bad.is_err());
    }
}
