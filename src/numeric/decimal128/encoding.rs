// ============================================================================
// Decimal128 Binary Encoding
// IEEE 754-2008 binary integer decimal (BID) interchange format
// ============================================================================
//
// Layout of the 128 bits, most significant first:
//
//   [127]       sign
//   [126..113]  biased exponent (exponent + 6176), 14 bits
//   [112..0]    coefficient, 113 bits
//
// When bits 126..125 are both set the combination field is special:
// `11110` marks infinity, `11111` NaN, and anything else is the "large
// coefficient" form whose coefficient always exceeds 10^34 - 1 and so decodes
// to a zero.

use super::{Decimal128, Repr, EXPONENT_BIAS, EXPONENT_MAX, MAX_COEFFICIENT};

const SIGN_BIT: u128 = 1 << 127;
const COMBINATION_SPECIAL: u128 = 0b11 << 125;
const INFINITY_BITS: u128 = 0b11110 << 122;
const NAN_BITS: u128 = 0b11111 << 122;
const SPECIAL_MASK: u128 = 0b11111 << 122;
const EXPONENT_MASK: u128 = 0x3fff;
const COEFFICIENT_MASK: u128 = (1 << 113) - 1;

impl Decimal128 {
    /// Canonical BID encoding.
    ///
    /// # Example
    /// ```
    /// use numeric_engine::numeric::Decimal128;
    ///
    /// let d = Decimal128::parse("+2.010").unwrap();
    /// assert_eq!(d.to_bid(), 0x303a_0000_0000_0000_0000_0000_0000_07da);
    /// assert_eq!(Decimal128::from_bid(d.to_bid()), d);
    /// ```
    pub fn to_bid(&self) -> u128 {
        let sign = if self.negative { SIGN_BIT } else { 0 };
        match self.repr {
            Repr::NaN => sign | NAN_BITS,
            Repr::Infinity => sign | INFINITY_BITS,
            Repr::Finite {
                coefficient,
                exponent,
            } => {
                let biased = (exponent + EXPONENT_BIAS) as u128;
                sign | (biased << 113) | coefficient
            },
        }
    }

    /// Decode a BID value. Non-canonical coefficients decode to zero with the
    /// encoded exponent.
    pub fn from_bid(bits: u128) -> Self {
        let negative = bits & SIGN_BIT != 0;

        if bits & COMBINATION_SPECIAL == COMBINATION_SPECIAL {
            return match bits & SPECIAL_MASK {
                NAN_BITS => Self::NAN.with_sign(negative),
                INFINITY_BITS => Self::infinity(negative),
                _ => {
                    let biased = ((bits >> 111) & EXPONENT_MASK) as i32;
                    let exponent = (biased - EXPONENT_BIAS).min(EXPONENT_MAX);
                    Self::finite_unchecked(negative, 0, exponent)
                },
            };
        }

        let biased = ((bits >> 113) & EXPONENT_MASK) as i32;
        let coefficient = bits & COEFFICIENT_MASK;
        let coefficient = if coefficient > MAX_COEFFICIENT {
            0
        } else {
            coefficient
        };
        Self::finite_unchecked(negative, coefficient, biased - EXPONENT_BIAS)
    }

    /// BID encoding split into `(high, low)` 64-bit words.
    pub fn to_bid_parts(&self) -> (u64, u64) {
        let bits = self.to_bid();
        ((bits >> 64) as u64, bits as u64)
    }

    pub fn from_bid_parts(high: u64, low: u64) -> Self {
        Self::from_bid((u128::from(high) << 64) | u128::from(low))
    }

    /// 16-byte little-endian BID, the layout used on the wire.
    pub fn to_le_bytes(&self) -> [u8; 16] {
        self.to_bid().to_le_bytes()
    }

    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self::from_bid(u128::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal128 {
        Decimal128::parse(s).unwrap()
    }

    #[test]
    fn test_encode_integers() {
        assert_eq!(Decimal128::from(0).to_bid_parts(), (0x3040000000000000, 0));
        assert_eq!(
            Decimal128::from(i32::MAX).to_bid_parts(),
            (0x3040000000000000, 0x7fffffff)
        );
        assert_eq!(
            Decimal128::from(i32::MIN).to_bid_parts(),
            (0xb040000000000000, 0x80000000)
        );
        assert_eq!(
            Decimal128::from(i64::MAX).to_bid_parts(),
            (0x3040000000000000, 0x7fffffffffffffff)
        );
        assert_eq!(
            Decimal128::from(i64::MIN).to_bid_parts(),
            (0xb040000000000000, 0x8000000000000000)
        );
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(dec("+2.010").to_bid_parts(), (0x303a000000000000, 0x7da));
        assert_eq!(dec("-0.0").to_bid_parts(), (0xb03e000000000000, 0));
        assert_eq!(dec("1E+12").to_bid_parts(), (0x3058000000000000, 1));
    }

    #[test]
    fn test_encode_specials() {
        assert_eq!(Decimal128::INFINITY.to_bid_parts(), (0x7800000000000000, 0));
        assert_eq!(Decimal128::NEG_INFINITY.to_bid_parts(), (0xf800000000000000, 0));
        assert_eq!(Decimal128::NAN.to_bid_parts(), (0x7c00000000000000, 0));
        assert_eq!(dec("-NaN").to_bid_parts(), (0xfc00000000000000, 0));
    }

    #[test]
    fn test_decode_round_trip() {
        for s in [
            "0", "-0", "5.00", "-2.087015E-278", "1E-6176", "Infinity", "-Infinity", "NaN",
            "-NaN",
        ] {
            let d = dec(s);
            assert_eq!(Decimal128::from_bid(d.to_bid()), d, "{}", s);
            assert_eq!(Decimal128::from_le_bytes(d.to_le_bytes()), d, "{}", s);
            let (high, low) = d.to_bid_parts();
            assert_eq!(Decimal128::from_bid_parts(high, low), d, "{}", s);
        }
        assert_eq!(Decimal128::from_bid(Decimal128::MAX.to_bid()), Decimal128::MAX);
        assert_eq!(Decimal128::from_bid(Decimal128::MIN.to_bid()), Decimal128::MIN);
    }

    #[test]
    fn test_decode_non_canonical() {
        // Coefficient 10^34 with exponent 0
        let bits = (6176u128 << 113) | (MAX_COEFFICIENT + 1);
        let d = Decimal128::from_bid(bits);
        assert!(d.is_zero());
        assert_eq!(d.exponent(), 0);

        // Large-coefficient form, biased exponent 6176
        let bits = COMBINATION_SPECIAL | (6176u128 << 111) | 1;
        let d = Decimal128::from_bid(bits);
        assert!(d.is_zero());
        assert_eq!(d.exponent(), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let bytes = dec("+2.010").to_le_bytes();
        assert_eq!(bytes[0], 0xda);
        assert_eq!(bytes[1], 0x07);
        assert_eq!(bytes[14], 0x3a);
        assert_eq!(bytes[15], 0x30);
    }
}
