// ============================================================================
// Numeric Module
// Exact decimal128 arithmetic and cross-kind numeric values
// ============================================================================
//
// This module provides:
// - Decimal128: IEEE 754-2008 decimal with exact (coefficient, exponent) storage
// - RoundingMode / Signals: rounding direction and exception flags
// - NumericValue: closed variant over int, long, double and decimal
// - compare_values: total order across all four kinds by mathematical value
// - NumericError: error type shared by parsing, conversion and operators
//
// Design principles:
// - Values are immutable Copy types
// - All fallible operations return Result (no panics)
// - Rounding is always reported, never silent

pub mod compare;
pub mod decimal128;
mod errors;
#[cfg(feature = "serde")]
pub mod extended_json;
mod rounding;
pub mod value;

pub use compare::{compare_values, to_decimal128, values_equal};
pub use decimal128::Decimal128;
pub use errors::{NumericError, NumericResult, ParseErrorKind};
pub use rounding::{RoundingMode, Signals};
pub use value::{NumericKind, NumericValue};
