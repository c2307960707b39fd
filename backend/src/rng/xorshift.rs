//! Seeded draw stream for the call center
//!
//! One xorshift64* stream feeds every random quantity in a run. The arrival
//! generator and the calls take turns on it in event order:
//!
//! ```text
//! t=0      generator: interval  (first arrival)
//! t=a1     generator: interval  (call 1 spawned just before)
//! t=a1     call 1:    service   (admitted at once)
//! t=a2     generator: interval
//! ...      call k:    service   (drawn only when an agent frees up)
//! ```
//!
//! Changing the staffing level moves the service draws around, so only the
//! whole sequence is reproducible, never a single sub-stream. The state is a
//! single `u64`, which is all a checkpoint needs to resume the stream.

use serde::{Deserialize, Serialize};

/// 2^-52, the spacing of the unit draws
const UNIT_STEP: f64 = 1.0 / (1u64 << 52) as f64;

/// Seeded xorshift64* stream
///
/// # Example
/// ```
/// use call_center_sim_core::RngManager;
///
/// let mut rng = RngManager::new(42);
/// let gap = rng.exponential(0.5); // minutes until the next call
/// assert!(gap > 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Seed the stream. Zero is mapped to 1 since xorshift never leaves 0.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Advance and return the next raw 64-bit output.
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// State to hand to [`RngManager::new`] when restoring a checkpoint.
    ///
    /// ```
    /// use call_center_sim_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let mut resumed = RngManager::new(rng.get_state());
    /// assert_eq!(rng.next(), resumed.next());
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Uniform draw strictly inside (0, 1).
    ///
    /// Takes the top 52 bits and centres them in their cell, so neither
    /// endpoint is reachable and `ln` stays finite and non-zero.
    pub fn next_unit(&mut self) -> f64 {
        unit_from_bits(self.next())
    }

    /// Exponential draw with the given rate, always strictly positive.
    ///
    /// Used for inter-arrival gaps (rate λ) and service durations
    /// (rate 1 / mean service). Consumes exactly one raw output.
    pub fn exponential(&mut self, rate: f64) -> f64 {
        -self.next_unit().ln() / rate
    }
}

fn unit_from_bits(bits: u64) -> f64 {
    ((bits >> 12) as f64 + 0.5) * UNIT_STEP
}
