//! Deterministic pseudo-random number generator.
//!
//! A linear congruential generator with fixed constants, so that a game
//! replays bit-for-bit from its seed. Each match owns its own instance;
//! there is no process-wide generator.

/// LCG multiplier.
const MULTIPLIER: i64 = 22_695_477;

/// LCG increment.
const INCREMENT: i64 = 1;

/// Number of advances performed by [`Rng::set_seed`] before first use.
const WARM_UP: usize = 3;

/// Deterministic LCG used by the `Flip` instruction and world generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rng {
    seed: i64,
}

impl Rng {
    /// Create a generator seeded with `seed` (warm-up applied).
    #[must_use]
    pub fn new(seed: i64) -> Self {
        let mut rng = Self { seed: 0 };
        rng.set_seed(seed);
        rng
    }

    /// Reset the sequence: store `seed`, then advance three times.
    pub fn set_seed(&mut self, seed: i64) {
        self.seed = seed;
        for _ in 0..WARM_UP {
            self.advance();
        }
    }

    /// Current internal state.
    #[must_use]
    pub const fn seed(&self) -> i64 {
        self.seed
    }

    #[inline]
    fn advance(&mut self) {
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    }

    /// Draw an integer in `[0, n)`.
    ///
    /// The state update wraps at 64 bits. Division truncates toward zero, so
    /// the intermediate value may be negative; the final remainder is always
    /// taken as the non-negative one.
    ///
    /// Returns 0 when `n` is 0.
    pub fn random_int(&mut self, n: u32) -> u32 {
        self.advance();
        if n == 0 {
            return 0;
        }
        let x = (self.seed / 65_536) % 16_384;
        // rem_euclid with a positive modulus lies in [0, n)
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = x.rem_euclid(i64::from(n)) as u32;
        value
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_golden_sequence_seed_12345() {
        let mut rng = Rng::new(12345);
        let values: Vec<u32> = (0..10).map(|_| rng.random_int(16_384)).collect();
        assert_eq!(
            values,
            vec![7194, 2933, 10387, 5575, 100, 15976, 430, 9740, 9449, 1637]
        );
    }

    #[test]
    fn test_golden_sequence_seed_42_small_range() {
        let mut rng = Rng::new(42);
        let values: Vec<u32> = (0..10).map(|_| rng.random_int(100)).collect();
        assert_eq!(values, vec![45, 86, 57, 39, 94, 90, 58, 30, 24, 39]);
    }

    #[test]
    fn test_sequence_reproducible() {
        let mut a = Rng::new(987_654_321);
        let mut b = Rng::new(987_654_321);
        for n in 1..500 {
            assert_eq!(a.random_int(n), b.random_int(n));
        }
    }

    #[test]
    fn test_set_seed_restarts_sequence() {
        let mut rng = Rng::new(7);
        let first: Vec<u32> = (0..5).map(|_| rng.random_int(1000)).collect();
        rng.set_seed(7);
        let second: Vec<u32> = (0..5).map(|_| rng.random_int(1000)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_range_one_always_zero() {
        let mut rng = Rng::new(3);
        for _ in 0..100 {
            assert_eq!(rng.random_int(1), 0);
        }
    }

    #[test]
    fn test_negative_intermediate_stays_in_range() {
        // seed 12345 produces negative intermediates within the first few draws
        let mut rng = Rng::new(12345);
        for _ in 0..2000 {
            assert!(rng.random_int(7) < 7);
        }
    }
}
