//! Seedable Xorshift64 generator used to scatter points.
//!
//! Effects draw their initial layout from this generator so the CLI can
//! reproduce a snapshot from a seed and tests can pin exact layouts. The
//! browser binding seeds it from the clock.

use serde::{Deserialize, Serialize};

/// Xorshift64 (13, 7, 17). A zero seed is swapped for a fixed non-zero one
/// because zero is a fixed point of the recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Seeds from a millisecond timestamp, as reported by `Date.now()`.
    pub fn from_millis(millis: f64) -> Self {
        Self::new(millis.to_bits() ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in [0, 1), built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform in [-magnitude, magnitude).
    pub fn next_signed(&mut self, magnitude: f64) -> f64 {
        self.next_range(-magnitude, magnitude)
    }
}
