//! Deterministic random number generation for seat assignment.
//!
//! A session created with `SeatPreference::Random` flips a coin to decide
//! which colour its first joiner gets. The service owns one `GameRng`;
//! seeding it makes session creation reproducible in tests.
//!
//! ```
//! use hex_duel::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_bool(0.5), b.gen_bool(0.5));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::piece::Color;

/// Seeded ChaCha8 generator.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random boolean with given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Pick a colour with equal odds.
    pub fn coin_flip(&mut self) -> Color {
        if self.gen_bool(0.5) {
            Color::White
        } else {
            Color::Black
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.coin_flip(), rng2.coin_flip());
        }
    }

    #[test]
    fn test_coin_flip_hits_both_colors() {
        let mut rng = GameRng::new(7);
        let flips: Vec<Color> = (0..64).map(|_| rng.coin_flip()).collect();

        assert!(flips.contains(&Color::White));
        assert!(flips.contains(&Color::Black));
    }

    #[test]
    fn test_seed_accessor() {
        assert_eq!(GameRng::new(5).seed(), 5);
    }
}
