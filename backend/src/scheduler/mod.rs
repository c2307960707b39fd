//! Event scheduler: simulated clock plus the pending-event queue.
//!
//! The scheduler is the only owner of simulated time. It hands out events in
//! `(wake_time, sequence)` order and advances the clock to each event's wake
//! time as it is fired.
//!
//! # Example
//!
//! ```
//! use call_center_sim_core::models::TaskId;
//! use call_center_sim_core::scheduler::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.schedule(4.0, TaskId(1)).unwrap();
//! scheduler.schedule(2.0, TaskId(2)).unwrap();
//!
//! let first = scheduler.pop_due(10.0).unwrap().unwrap();
//! assert_eq!(first.task, TaskId(2));
//! assert_eq!(scheduler.now(), 2.0);
//! ```

mod event_queue;

pub use event_queue::{EventQueue, ScheduledEvent};

use crate::core::time::SimClock;
use crate::models::task::TaskId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduling invariant violations.
///
/// These indicate a bug in the engine, never a recoverable runtime condition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Cannot schedule event at {requested}: current time is {now}")]
    InvalidTime { requested: f64, now: f64 },

    #[error("Clock cannot move back from {now} to {requested}")]
    ClockRewind { requested: f64, now: f64 },

    #[error("Non-finite simulation time: {0}")]
    NonFiniteTime(f64),
}

/// Clock and event queue driven together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    clock: SimClock,
    queue: EventQueue,
    fired: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Schedule `task` to resume at `wake_time`.
    ///
    /// Returns the tie-break sequence number assigned to the event.
    pub fn schedule(&mut self, wake_time: f64, task: TaskId) -> Result<u64, SchedulerError> {
        if !wake_time.is_finite() {
            return Err(SchedulerError::NonFiniteTime(wake_time));
        }
        if wake_time < self.clock.now() {
            return Err(SchedulerError::InvalidTime {
                requested: wake_time,
                now: self.clock.now(),
            });
        }
        Ok(self.queue.push(wake_time, task))
    }

    /// Schedule `task` to resume `delay` time units from now.
    pub fn schedule_after(&mut self, delay: f64, task: TaskId) -> Result<u64, SchedulerError> {
        self.schedule(self.clock.now() + delay, task)
    }

    /// Pop the next event if it is due at or before `horizon`.
    ///
    /// The clock is advanced to the event's wake time. When the queue is empty
    /// or the earliest event lies beyond the horizon, nothing is popped and the
    /// clock does not move.
    pub fn pop_due(&mut self, horizon: f64) -> Result<Option<ScheduledEvent>, SchedulerError> {
        match self.queue.peek_time() {
            Some(t) if t <= horizon => {}
            _ => return Ok(None),
        }
        let Some(event) = self.queue.pop() else {
            return Ok(None);
        };
        self.clock.advance_to(event.wake_time)?;
        self.fired += 1;
        Ok(Some(event))
    }

    /// Wake time of the earliest pending event.
    pub fn next_wake_time(&self) -> Option<f64> {
        self.queue.peek_time()
    }

    /// Number of events still waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of events fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}
