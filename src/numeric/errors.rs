// ============================================================================
// Numeric Errors
// Error types for decimal parsing, conversion and update operators
// ============================================================================

use std::fmt;

/// Reasons a decimal string was rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Input was empty (or only whitespace)
    Empty,
    /// More than one leading sign character
    MultipleSigns,
    /// A character outside the decimal grammar
    InvalidCharacter,
    /// No digit in the coefficient (e.g. "." or "-E5")
    MissingDigits,
    /// Exponent marker without a valid exponent
    InvalidExponent,
    /// More significant digits than a decimal128 can hold without rounding
    TooManyDigits,
    /// Exponent cannot be represented without rounding or overflow
    ExponentOutOfRange,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::Empty => "empty input",
            ParseErrorKind::MultipleSigns => "multiple sign characters",
            ParseErrorKind::InvalidCharacter => "invalid character",
            ParseErrorKind::MissingDigits => "no digits in coefficient",
            ParseErrorKind::InvalidExponent => "malformed exponent",
            ParseErrorKind::TooManyDigits => "more than 34 significant digits",
            ParseErrorKind::ExponentOutOfRange => "exponent out of range",
        };
        f.write_str(text)
    }
}

/// Errors that can occur in numeric conversions and update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Malformed decimal text
    Parse(ParseErrorKind),
    /// Integer arithmetic left the representable range with no promotion path
    Overflow,
    /// Rounding was required where an exact result was demanded
    PrecisionLoss,
    /// Operator applied to a value kind it does not support
    TypeMismatch {
        /// Operator name, e.g. `$bit`
        operator: &'static str,
        /// Kind of the offending value, e.g. `decimal`
        found: &'static str,
    },
    /// NaN or infinity where a finite number is required
    InvalidInput,
    /// Attempted division by zero
    DivisionByZero,
}

impl NumericError {
    /// True for errors raised while parsing text.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, NumericError::Parse(_))
    }
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Parse(kind) => write!(f, "invalid decimal string: {}", kind),
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded the 64-bit integer range")
            },
            NumericError::PrecisionLoss => write!(
                f,
                "precision loss: result could not be represented exactly"
            ),
            NumericError::TypeMismatch { operator, found } => write!(
                f,
                "cannot apply {} to a value of non-matching type {}",
                operator, found
            ),
            NumericError::InvalidInput => write!(f, "invalid input: value is NaN or infinite"),
            NumericError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for NumericError {}

impl From<ParseErrorKind> for NumericError {
    fn from(kind: ParseErrorKind) -> Self {
        NumericError::Parse(kind)
    }
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::Overflow.to_string(),
            "arithmetic overflow: result exceeded the 64-bit integer range"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::Parse(ParseErrorKind::TooManyDigits).to_string(),
            "invalid decimal string: more than 34 significant digits"
        );
        assert_eq!(
            NumericError::TypeMismatch {
                operator: "$bit",
                found: "decimal"
            }
            .to_string(),
            "cannot apply $bit to a value of non-matching type decimal"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::Overflow, NumericError::Overflow);
        assert_ne!(NumericError::Overflow, NumericError::PrecisionLoss);
        assert!(NumericError::from(ParseErrorKind::Empty).is_parse_error());
        assert!(!NumericError::InvalidInput.is_parse_error());
    }
}
