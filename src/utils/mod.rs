// ============================================================================
// Utilities Module
// Helpers shared by demos, benchmarks and tests
// ============================================================================

mod seeded_random;

pub use seeded_random::SeededRandom;
