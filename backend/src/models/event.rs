//! Event logging for simulation replay and auditing.
//!
//! Every call state change is recorded as an [`Event`]. The log is the
//! structured trace of a run: tests use it to check FIFO admission and the
//! capacity invariant, and the CLI can dump it as JSON for offline analysis.
//!
//! # Event Types
//!
//! - **CallArrived**: a call entered the system (with the queue it saw)
//! - **CallQueued**: no agent was free; the call joined the wait-queue
//! - **CallAdmitted**: an agent picked the call up
//! - **ServiceCompleted**: the call released its agent
//!
//! # Example
//!
//! ```rust
//! use call_center_sim_core::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::CallArrived {
//!     time: 1.25,
//!     call_id: "call_00000001".to_string(),
//!     queue_length: 0,
//! });
//!
//! assert_eq!(log.events_for_call("call_00000001").len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Simulation event capturing a call state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Call arrived; `queue_length` is the wait-queue it observed
    CallArrived {
        time: f64,
        call_id: String,
        queue_length: usize,
    },

    /// Call joined the wait-queue at `position` (0 = head)
    CallQueued {
        time: f64,
        call_id: String,
        position: usize,
    },

    /// Call was admitted after waiting `wait` minutes
    CallAdmitted {
        time: f64,
        call_id: String,
        wait: f64,
        service_time: f64,
    },

    /// Call released its agent
    ServiceCompleted { time: f64, call_id: String },
}

impl Event {
    /// Simulated time the event occurred at
    pub fn time(&self) -> f64 {
        match self {
            Event::CallArrived { time, .. } => *time,
            Event::CallQueued { time, .. } => *time,
            Event::CallAdmitted { time, .. } => *time,
            Event::ServiceCompleted { time, .. } => *time,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::CallArrived { .. } => "CallArrived",
            Event::CallQueued { .. } => "CallQueued",
            Event::CallAdmitted { .. } => "CallAdmitted",
            Event::ServiceCompleted { .. } => "ServiceCompleted",
        }
    }

    pub fn call_id(&self) -> &str {
        match self {
            Event::CallArrived { call_id, .. } => call_id,
            Event::CallQueued { call_id, .. } => call_id,
            Event::CallAdmitted { call_id, .. } => call_id,
            Event::ServiceCompleted { call_id, .. } => call_id,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific call
    pub fn events_for_call(&self, call_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.call_id() == call_id)
            .collect()
    }

    /// Get events with `from <= time <= to`
    pub fn events_between(&self, from: f64, to: f64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.time() >= from && e.time() <= to)
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
