// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod update_operator;

pub use event_handler::{EventHandler, LoggingEventHandler, MutationEvent, NoOpEventHandler};
pub use update_operator::{OperatorOutcome, UpdateOperator};
