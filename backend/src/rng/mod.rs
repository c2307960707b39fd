//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the simulator MUST go through this module.
//!
//! The engine never touches process-wide random state. Every draw goes through
//! a [`RandomSource`] owned by the orchestrator, so a run is reproducible from
//! its seed alone.

mod xorshift;

pub use xorshift::RngManager;

/// Stream of samples consumed by the simulation processes.
///
/// Draw order matters: the arrival generator draws its inter-arrival interval
/// before spawning a call, and each call draws its service duration at the
/// moment it is admitted. Implementations must be deterministic for a given
/// seed.
pub trait RandomSource {
    /// Sample from an exponential distribution with the given rate.
    ///
    /// The returned value is strictly positive. `rate` must be positive and
    /// finite.
    fn next_exponential(&mut self, rate: f64) -> f64;
}

impl RandomSource for RngManager {
    fn next_exponential(&mut self, rate: f64) -> f64 {
        self.exponential(rate)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_exponential(&mut self, rate: f64) -> f64 {
        (**self).next_exponential(rate)
    }
}
