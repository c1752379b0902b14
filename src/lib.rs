// ============================================================================
// Numeric Engine Library
// Exact decimal arithmetic and typed numeric updates for document stores
// ============================================================================

//! # Numeric Engine
//!
//! IEEE 754-2008 decimal128 numbers and the document update operators that
//! mix them with 32/64-bit integers and doubles.
//!
//! ## Features
//!
//! - **Decimal128** with 34-digit coefficients, preserved trailing zeros,
//!   the five IEEE rounding modes and signaling flags
//! - **Cross-type comparison** by exact mathematical value across int, long,
//!   double and decimal
//! - **Update operators** `$inc`, `$mul` and `$bit` with configurable type
//!   promotion and overflow handling
//! - **In-memory collection** with multi-document updates and mutation events
//! - **Canonical BID encoding** and, with the `serde` feature, Extended JSON
//!
//! ## Example
//!
//! ```rust
//! use numeric_engine::prelude::*;
//! use std::sync::Arc;
//!
//! let prices = CollectionBuilder::new("prices")
//!     .build(Arc::new(NoOpEventHandler))
//!     .unwrap();
//!
//! prices.insert(Document::new().with_field("price", NumericValue::decimal("10201.01").unwrap()));
//!
//! let result = prices.update_many(None, &UpdateSpec::mul("price", NumericValue::long(1_000_000_000_000)));
//! assert_eq!(result.modified, 1);
//!
//! let doc = &prices.find(None)[0];
//! assert_eq!(doc.get("price").unwrap().to_string(), "NumberDecimal(\"10201010000000000.00\")");
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        ArithmeticPolicy, BatchErrorPolicy, BitwiseOp, Document, DocumentId, EngineConfig,
        FieldFilter, FieldValue, Int64OverflowPolicy, MixedPrecedence, Predicate,
        UpdateOperatorType, UpdateResult, UpdateSpec,
    };
    pub use crate::engine::{
        create_from_config, create_operator, increment, multiply, Bitwise, Collection,
        CollectionBuilder, FieldMutation, Increment, Multiply,
    };
    pub use crate::interfaces::{
        EventHandler, LoggingEventHandler, MutationEvent, NoOpEventHandler, OperatorOutcome,
        UpdateOperator,
    };
    pub use crate::numeric::{
        compare_values, values_equal, Decimal128, NumericError, NumericKind, NumericResult,
        NumericValue, RoundingMode, Signals,
    };
}
