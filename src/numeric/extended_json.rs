// ============================================================================
// Extended JSON
// MongoDB canonical Extended JSON wrappers for numeric values
// ============================================================================
//
// {"$numberInt": "5"}, {"$numberLong": "5"}, {"$numberDouble": "5.5"} and
// {"$numberDecimal": "5.00"}. Payloads are always strings so that no value is
// reinterpreted by a JSON number parser.

use serde::{Deserialize, Serialize};

use super::decimal128::Decimal128;
use super::errors::{NumericError, ParseErrorKind};
use super::value::NumericValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ExtendedJson {
    Int {
        #[serde(rename = "$numberInt")]
        value: String,
    },
    Long {
        #[serde(rename = "$numberLong")]
        value: String,
    },
    Double {
        #[serde(rename = "$numberDouble")]
        value: String,
    },
    Decimal {
        #[serde(rename = "$numberDecimal")]
        value: String,
    },
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        (if value < 0.0 { "-Infinity" } else { "Infinity" }).to_string()
    } else {
        format!("{:?}", value)
    }
}

fn parse_double(text: &str) -> Result<f64, NumericError> {
    match text {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse()
            .map_err(|_| NumericError::Parse(ParseErrorKind::InvalidCharacter)),
    }
}

impl From<NumericValue> for ExtendedJson {
    fn from(value: NumericValue) -> Self {
        match value {
            NumericValue::Int32(v) => ExtendedJson::Int {
                value: v.to_string(),
            },
            NumericValue::Int64(v) => ExtendedJson::Long {
                value: v.to_string(),
            },
            NumericValue::Double(v) => ExtendedJson::Double {
                value: format_double(v),
            },
            NumericValue::Decimal128(d) => ExtendedJson::Decimal {
                value: d.to_text(),
            },
        }
    }
}

impl TryFrom<ExtendedJson> for NumericValue {
    type Error = NumericError;

    fn try_from(json: ExtendedJson) -> Result<Self, Self::Error> {
        let invalid = |_: std::num::ParseIntError| NumericError::Parse(ParseErrorKind::InvalidCharacter);
        match json {
            ExtendedJson::Int { value } => value.parse().map(NumericValue::Int32).map_err(invalid),
            ExtendedJson::Long { value } => value.parse().map(NumericValue::Int64).map_err(invalid),
            ExtendedJson::Double { value } => parse_double(&value).map(NumericValue::Double),
            ExtendedJson::Decimal { value } => Decimal128::parse(&value).map(NumericValue::Decimal128),
        }
    }
}

/// Serialize a value as canonical Extended JSON.
///
/// # Example
/// ```
/// use numeric_engine::numeric::{extended_json, NumericValue};
///
/// let value = NumericValue::decimal("5.00").unwrap();
/// let json = extended_json::to_extended_json(&value).unwrap();
/// assert_eq!(json, r#"{"$numberDecimal":"5.00"}"#);
/// assert_eq!(extended_json::from_extended_json(&json).unwrap(), value);
/// ```
pub fn to_extended_json(value: &NumericValue) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Parse a value from canonical Extended JSON.
pub fn from_extended_json(json: &str) -> serde_json::Result<NumericValue> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_each_kind() {
        assert_eq!(
            to_extended_json(&NumericValue::Int32(5)).unwrap(),
            r#"{"$numberInt":"5"}"#
        );
        assert_eq!(
            to_extended_json(&NumericValue::Int64(-9223372036854775808)).unwrap(),
            r#"{"$numberLong":"-9223372036854775808"}"#
        );
        assert_eq!(
            to_extended_json(&NumericValue::Double(5.0)).unwrap(),
            r#"{"$numberDouble":"5.0"}"#
        );
        assert_eq!(
            to_extended_json(&NumericValue::Double(f64::NEG_INFINITY)).unwrap(),
            r#"{"$numberDouble":"-Infinity"}"#
        );
        assert_eq!(
            to_extended_json(&NumericValue::decimal("1.020101E+16").unwrap()).unwrap(),
            r#"{"$numberDecimal":"1.020101E+16"}"#
        );
    }

    #[test]
    fn test_round_trip_preserves_kind_and_scale() {
        for value in [
            NumericValue::Int32(-7),
            NumericValue::Int64(7),
            NumericValue::Double(0.1),
            NumericValue::decimal("5.00").unwrap(),
            NumericValue::decimal("-0E-12").unwrap(),
        ] {
            let json = to_extended_json(&value).unwrap();
            assert_eq!(from_extended_json(&json).unwrap(), value, "{}", json);
        }
    }

    #[test]
    fn test_nan_round_trip() {
        let json = to_extended_json(&NumericValue::Double(f64::NAN)).unwrap();
        assert!(from_extended_json(&json).unwrap().is_nan());
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert!(from_extended_json(r#"{"$numberInt":"5000000000"}"#).is_err());
        assert!(from_extended_json(r#"{"$numberDecimal":"1.2.3"}"#).is_err());
        assert!(from_extended_json(r#"{"$numberFloat":"1"}"#).is_err());
        assert!(from_extended_json("5").is_err());
    }
}
