// ============================================================================
// Engine Configuration
// Arithmetic policy and batch behaviour for numeric document updates
// ============================================================================

use crate::numeric::RoundingMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Arithmetic Policy
// ============================================================================

/// What `$inc`/`$mul` do when a 64-bit integer result leaves the i64 range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Int64OverflowPolicy {
    /// Reject the update with `NumericError::Overflow`
    #[default]
    Fail,

    /// Compute the result exactly as a Decimal128
    PromoteToDecimal,
}

/// Result kind when one operand is a double and the other a decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MixedPrecedence {
    /// Double dominates: the decimal is converted to the nearest double
    /// and the loss is tagged as precision loss
    #[default]
    DoubleWins,

    /// Decimal dominates: the double's exact binary value joins decimal
    /// arithmetic
    DecimalWins,
}

/// Rules shared by every arithmetic update operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArithmeticPolicy {
    /// Rounding applied when a decimal result exceeds 34 digits
    pub rounding_mode: RoundingMode,

    pub int64_overflow: Int64OverflowPolicy,

    pub mixed_precedence: MixedPrecedence,

    /// Fail with `NumericError::PrecisionLoss` instead of storing a rounded result
    pub strict_precision: bool,
}

impl ArithmeticPolicy {
    /// Builder method: Set the rounding mode
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = mode;
        self
    }

    /// Builder method: Set the 64-bit overflow policy
    pub fn with_int64_overflow(mut self, policy: Int64OverflowPolicy) -> Self {
        self.int64_overflow = policy;
        self
    }

    /// Builder method: Set double/decimal precedence
    pub fn with_mixed_precedence(mut self, precedence: MixedPrecedence) -> Self {
        self.mixed_precedence = precedence;
        self
    }

    /// Builder method: Reject rounded results
    pub fn with_strict_precision(mut self, strict: bool) -> Self {
        self.strict_precision = strict;
        self
    }
}

// ============================================================================
// Batch Error Policy
// ============================================================================

/// How a multi-document update reacts to a per-document failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BatchErrorPolicy {
    /// Stop at the first failing document; earlier documents keep their update
    #[default]
    AbortOnError,

    /// Skip failing documents and record their errors
    ContinueOnError,
}

// ============================================================================
// Complete Engine Configuration
// ============================================================================

/// Configuration for a collection and the operators it creates
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    pub arithmetic: ArithmeticPolicy,

    pub batch_errors: BatchErrorPolicy,

    /// Worker threads used to compute multi-document updates (1 = inline)
    pub parallel_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arithmetic: ArithmeticPolicy::default(),
            batch_errors: BatchErrorPolicy::default(),
            parallel_workers: 1,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Replace the arithmetic policy
    pub fn with_arithmetic(mut self, arithmetic: ArithmeticPolicy) -> Self {
        self.arithmetic = arithmetic;
        self
    }

    /// Builder method: Set the rounding mode
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.arithmetic.rounding_mode = mode;
        self
    }

    /// Builder method: Set the 64-bit overflow policy
    pub fn with_int64_overflow(mut self, policy: Int64OverflowPolicy) -> Self {
        self.arithmetic.int64_overflow = policy;
        self
    }

    /// Builder method: Set double/decimal precedence
    pub fn with_mixed_precedence(mut self, precedence: MixedPrecedence) -> Self {
        self.arithmetic.mixed_precedence = precedence;
        self
    }

    /// Builder method: Reject rounded results
    pub fn with_strict_precision(mut self, strict: bool) -> Self {
        self.arithmetic.strict_precision = strict;
        self
    }

    /// Builder method: Set the batch error policy
    pub fn with_batch_errors(mut self, policy: BatchErrorPolicy) -> Self {
        self.batch_errors = policy;
        self
    }

    /// Builder method: Set the number of update workers
    pub fn with_parallel_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = workers;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.parallel_workers == 0 {
            return Err("Parallel workers must be at least 1".to_string());
        }

        if self.parallel_workers > 1024 {
            return Err("Parallel workers cannot exceed 1024".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl EngineConfig {
    /// Exactness first
    /// - Rounded decimal results are rejected
    /// - 64-bit overflow fails
    /// - Batch stops at the first error
    pub fn strict() -> Self {
        Self::new()
            .with_strict_precision(true)
            .with_int64_overflow(Int64OverflowPolicy::Fail)
            .with_batch_errors(BatchErrorPolicy::AbortOnError)
    }

    /// Decimal-centric configuration
    /// - A decimal operand beats a double one
    /// - 64-bit overflow continues in decimal
    pub fn decimal_first() -> Self {
        Self::new()
            .with_mixed_precedence(MixedPrecedence::DecimalWins)
            .with_int64_overflow(Int64OverflowPolicy::PromoteToDecimal)
    }
}
