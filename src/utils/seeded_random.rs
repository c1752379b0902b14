// ============================================================================
// Seeded Random
// Deterministic linear congruential generator for reproducible workloads
// ============================================================================

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233280;

/// Linear congruential generator `seed = (seed * 9301 + 49297) % 233280`.
///
/// Small period, but every run with the same seed produces the same stream,
/// which is what simulations comparing two numeric representations need.
///
/// # Example
/// ```
/// use numeric_engine::utils::SeededRandom;
///
/// let mut a = SeededRandom::new(6);
/// let mut b = SeededRandom::new(6);
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: seed % MODULUS,
        }
    }

    /// Current generator state
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.seed = (self.seed * MULTIPLIER + INCREMENT) % MODULUS;
        self.seed as f64 / MODULUS as f64
    }

    /// Next value in `[min, max)`
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(0)
    }
}
