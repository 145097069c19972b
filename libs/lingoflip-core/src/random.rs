//! Random number generators handed to the game engines.
//!
//! Engines are generic over [`rand::Rng`]; shuffling goes through
//! [`rand::seq::SliceRandom`] and letter masking through [`Rng::gen_bool`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Reproducible generator for replays and tests.
pub type SeededRng = ChaCha8Rng;

/// Generator for normal play, seeded from the operating system.
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}

pub fn seeded(seed: u64) -> SeededRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `probability` clamped into `[0, 1]`, with NaN treated as zero.
pub(crate) fn chance(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}
