// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod document;
pub mod filter;
pub mod update;

pub use config::{
    ArithmeticPolicy, BatchErrorPolicy, EngineConfig, Int64OverflowPolicy, MixedPrecedence,
};
pub use document::{Document, DocumentId, FieldValue};
pub use filter::{compare_field_values, FieldFilter, Predicate};
pub use update::{BitwiseOp, UpdateOperatorType, UpdateResult, UpdateSpec};
