//! Deterministic bounded random source.
//!
//! Record generation only ever asks for integers in `[0, max)`. Each such
//! draw consumes exactly one 64-bit word from a ChaCha8 stream, so the k-th
//! draw is a function of the seed and k alone and replaying a seed replays
//! every record field.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded pseudo-random source owned by a single generation call.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Creates a source whose whole output sequence is determined by `seed`.
    #[must_use]
    pub fn from_numeric_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns an integer in `[0, max)`, or `0` when `max` is `0`.
    ///
    /// Maps one 64-bit word onto the range by widening multiplication, so
    /// every draw consumes exactly one word. Bias is below `max / 2^64`.
    ///
    /// # Example
    ///
    /// ```
    /// use pinoy_gen::RandomSource;
    ///
    /// let mut a = RandomSource::from_numeric_seed(7);
    /// let mut b = RandomSource::from_numeric_seed(7);
    /// for _ in 0..5 {
    ///     let n = a.next_bounded(1000);
    ///     assert!(n < 1000);
    ///     assert_eq!(n, b.next_bounded(1000));
    /// }
    /// ```
    pub fn next_bounded(&mut self, max: u64) -> u64 {
        let word = self.rng.next_u64();
        let wide = u128::from(word) * u128::from(max);
        u64::try_from(wide >> 64).unwrap_or_default()
    }

    /// Picks an element of `items` with one bounded draw.
    ///
    /// Returns `None` without consuming a draw when `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let len = u64::try_from(items.len()).ok()?;
        let index = usize::try_from(self.next_bounded(len)).ok()?;
        items.get(index)
    }
}
