//! Seeded random number generator for deterministic generation

use std::time::{SystemTime, UNIX_EPOCH};

/// Deterministic 32-bit PRNG (mulberry32).
///
/// Every generation run owns exactly one `Rng`; all randomness routes
/// through it, so a `(kind, size, seed)` triple reproduces the same map
/// bit for bit. The 32-bit wraparound arithmetic is part of the output
/// contract and must not be widened.
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Derive a nondeterministic 32-bit seed for callers that did not
    /// supply one. The exact recipe is not part of the reproducibility
    /// contract; the returned seed is reported in the result stats.
    pub fn seed_from_entropy() -> u32 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let r = (rand::random::<f64>() * (i32::MAX as f64)).floor() as u64;
        (r.wrapping_add(millis % 1_000_000) & 0xFFFF_FFFF) as u32
    }

    /// Next output in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state ^ (self.state >> 15);
        t = t.wrapping_mul(self.state | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Uniform integer in `[lo, hi]`, inclusive on both ends.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.random() * f64::from(hi - lo + 1)) as i32
    }

    /// Uniform integer in `[lo, hi]`, inclusive on both ends.
    pub fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.random() * (hi - lo + 1) as f64) as usize
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.random() < probability
    }

    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            Some(&slice[(self.random() * slice.len() as f64) as usize])
        }
    }

    /// In-place Fisher-Yates shuffle, high index down to 1.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = (self.random() * (i + 1) as f64) as usize;
            slice.swap(i, j);
        }
    }

    /// Weighted pick over `weights`, returning the chosen index.
    ///
    /// Draws `r` in `[0, total)` and walks the slice subtracting each
    /// weight until `r` drops to zero or below. A degenerate all-zero
    /// weight table returns the last index.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut r = self.random() * total;
        for (i, w) in weights.iter().enumerate() {
            r -= w;
            if r <= 0.0 {
                return i;
            }
        }
        weights.len().saturating_sub(1)
    }
}
