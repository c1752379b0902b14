// ============================================================================
// Engine Module
// Update operators, field adapter and the in-memory collection
// ============================================================================

mod bitwise;
mod collection;
mod increment;
mod multiply;
mod promotion;

pub mod factory;
pub mod field_adapter;

pub use bitwise::Bitwise;
pub use collection::Collection;
pub use factory::{create_from_config, create_operator, CollectionBuilder};
pub use field_adapter::{apply_to_field, evaluate_field, write_back, FieldMutation};
pub use increment::{increment, Increment};
pub use multiply::{multiply, Multiply};
