//! Time management for the simulation
//!
//! Simulated time is a logical scalar measured in minutes. It only moves when
//! the scheduler fires the next pending event, and it never moves backwards.

use crate::scheduler::SchedulerError;
use serde::{Deserialize, Serialize};

/// Monotonic simulation clock
///
/// # Example
/// ```
/// use call_center_sim_core::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0.0);
///
/// clock.advance_to(2.5).unwrap();
/// assert_eq!(clock.now(), 2.5);
///
/// // Rewinding is rejected
/// assert!(clock.advance_to(1.0).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Current simulated time (minutes since start)
    now: f64,
}

impl SimClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Get the current simulated time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward to `time`
    ///
    /// Advancing to the current time is a no-op. Any attempt to move to an
    /// earlier time fails and leaves the clock untouched.
    pub fn advance_to(&mut self, time: f64) -> Result<(), SchedulerError> {
        if !time.is_finite() {
            return Err(SchedulerError::NonFiniteTime(time));
        }
        if time < self.now {
            return Err(SchedulerError::ClockRewind {
                requested: time,
                now: self.now,
            });
        }
        self.now = time;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_leaves_clock_untouched() {
        let mut clock = SimClock::new();
        clock.advance_to(10.0).unwrap();

        let err = clock.advance_to(9.999).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::ClockRewind {
                requested: 9.999,
                now: 10.0
            }
        );
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_non_finite_time_rejected() {
        let mut clock = SimClock::new();
        assert!(clock.advance_to(f64::NAN).is_err());
        assert!(clock.advance_to(f64::INFINITY).is_err());
        assert_eq!(clock.now(), 0.0);
    }
}
