//! # RNG Module
//!
//! Tiny deterministic RNG for synthetic inputs and test shuffles.
//!
//! **Generator**: XorShift64. Same seed, same sequence, which keeps
//! generated measurement files and benchmark inputs reproducible.
//!
//! **Bounded sampling**: Lemire's method (multiply-high, no division), with
//! a bitmask fast path for powers of two.
//!
//! **No `Copy`**: copying an RNG duplicates the stream. Use `Clone` explicitly.

/// Deterministic RNG. NOT thread-safe; give each thread its own instance.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seed 0 is mapped to a non-zero value to avoid the all-zero lockup state.
    #[inline]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Marsaglia's (13, 7, 17) triple: full period of 2^64 - 1.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, upper)`.
    ///
    /// # Panics
    /// Panics in debug builds if `upper` is 0.
    #[inline]
    pub fn next_usize(&mut self, upper: usize) -> usize {
        debug_assert!(upper > 0, "upper bound must be > 0");
        if upper.is_power_of_two() {
            return (self.next_u64() as usize) & (upper - 1);
        }
        self.bounded_u64(upper as u64) as usize
    }

    /// Uniform value in `[lo, hi]` (inclusive).
    #[inline]
    pub fn next_in(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi, "empty interval");
        let span = (hi - lo) as u64 + 1;
        lo + self.bounded_u64(span) as i64
    }

    // Lemire rejection threshold: 2^64 mod upper. Rejection is rare.
    #[inline]
    fn bounded_u64(&mut self, upper: u64) -> u64 {
        let threshold = upper.wrapping_neg() % upper;
        loop {
            let m = (self.next_u64() as u128) * (upper as u128);
            if (m as u64) >= threshold {
                return (m >> 64) as u64;
            }
        }
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(0)
    }
}
