// ============================================================================
// Collection Factory
// Creates operators and collections with proper configuration
// ============================================================================

use crate::domain::config::{
    ArithmeticPolicy, BatchErrorPolicy, EngineConfig, Int64OverflowPolicy, MixedPrecedence,
};
use crate::domain::UpdateOperatorType;
use crate::engine::{Bitwise, Collection, Increment, Multiply};
use crate::interfaces::{EventHandler, UpdateOperator};
use crate::numeric::RoundingMode;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates the update operator for an operator type
pub fn create_operator(
    operator_type: &UpdateOperatorType,
    policy: &ArithmeticPolicy,
) -> Box<dyn UpdateOperator> {
    match operator_type {
        UpdateOperatorType::Increment => Box::new(Increment::new(*policy)),
        UpdateOperatorType::Multiply => Box::new(Multiply::new(*policy)),
        UpdateOperatorType::Bitwise(op) => Box::new(Bitwise::new(*op)),
    }
}

/// Creates a collection from configuration
///
/// # Arguments
/// * `name` - Collection name
/// * `config` - Engine configuration
/// * `event_handler` - Event handler for mutation events
///
/// # Returns
/// * `Result<Collection, String>` - Configured collection or error
///
/// # Example
/// ```
/// use numeric_engine::prelude::*;
/// use numeric_engine::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let coll = create_from_config("prices", EngineConfig::strict(), Arc::new(NoOpEventHandler)).unwrap();
/// assert_eq!(coll.get_name(), "prices");
/// ```
pub fn create_from_config(
    name: impl Into<String>,
    config: EngineConfig,
    event_handler: Arc<dyn EventHandler>,
) -> Result<Collection, String> {
    config.validate()?;

    let name = name.into();
    if name.is_empty() {
        return Err("Collection name must not be empty".to_string());
    }

    Ok(Collection::new(name, config, event_handler))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating collections with fluent API
///
/// # Example
/// ```
/// use numeric_engine::prelude::*;
/// use numeric_engine::engine::factory::CollectionBuilder;
/// use std::sync::Arc;
///
/// let coll = CollectionBuilder::new("accounts")
///     .decimal_wins()
///     .continue_on_error()
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
/// assert_eq!(coll.get_name(), "accounts");
/// ```
pub struct CollectionBuilder {
    name: String,
    config: EngineConfig,
}

impl CollectionBuilder {
    /// Create a new builder with the default configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: EngineConfig::default(),
        }
    }

    // ========================================================================
    // Arithmetic Configuration
    // ========================================================================

    /// Set the rounding mode for decimal results
    pub fn rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.config.arithmetic.rounding_mode = mode;
        self
    }

    /// Promote 64-bit integer overflow to Decimal128 instead of failing
    pub fn promote_int64_overflow(mut self) -> Self {
        self.config.arithmetic.int64_overflow = Int64OverflowPolicy::PromoteToDecimal;
        self
    }

    /// Double/decimal arithmetic produces a double (default)
    pub fn double_wins(mut self) -> Self {
        self.config.arithmetic.mixed_precedence = MixedPrecedence::DoubleWins;
        self
    }

    /// Double/decimal arithmetic produces a decimal
    pub fn decimal_wins(mut self) -> Self {
        self.config.arithmetic.mixed_precedence = MixedPrecedence::DecimalWins;
        self
    }

    /// Reject updates whose result would be rounded
    pub fn strict_precision(mut self) -> Self {
        self.config.arithmetic.strict_precision = true;
        self
    }

    // ========================================================================
    // Batch Configuration
    // ========================================================================

    /// Stop a multi-document update at its first failure (default)
    pub fn abort_on_error(mut self) -> Self {
        self.config.batch_errors = BatchErrorPolicy::AbortOnError;
        self
    }

    /// Skip failing documents in a multi-document update
    pub fn continue_on_error(mut self) -> Self {
        self.config.batch_errors = BatchErrorPolicy::ContinueOnError;
        self
    }

    /// Compute multi-document updates on `workers` threads
    pub fn with_parallel_workers(mut self, workers: usize) -> Self {
        self.config.parallel_workers = workers;
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// Start from [`EngineConfig::strict`]
    pub fn strict(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: EngineConfig::strict(),
        }
    }

    /// Start from [`EngineConfig::decimal_first`]
    pub fn decimal_first(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: EngineConfig::decimal_first(),
        }
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the collection
    pub fn build(self, event_handler: Arc<dyn EventHandler>) -> Result<Collection, String> {
        create_from_config(self.name, self.config, event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }
}
