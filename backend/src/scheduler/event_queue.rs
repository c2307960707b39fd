//! Time-ordered queue of pending task resumptions.

use crate::models::task::TaskId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pending resumption of a task.
///
/// Events are consumed exactly once. Ordering is by `(wake_time, sequence)`,
/// earliest first, so events scheduled for the same instant fire in the order
/// they were scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub wake_time: f64,
    pub sequence: u64,
    pub task: TaskId,
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    // Reversed: BinaryHeap is a max-heap and we want the earliest event on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .wake_time
            .total_cmp(&self.wake_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Priority queue of [`ScheduledEvent`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    heap: BinaryHeap<ScheduledEvent>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a resumption and return the sequence number it was assigned.
    pub fn push(&mut self, wake_time: f64, task: TaskId) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledEvent {
            wake_time,
            sequence,
            task,
        });
        sequence
    }

    /// Wake time of the earliest pending event.
    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.wake_time)
    }

    pub fn peek(&self) -> Option<&ScheduledEvent> {
        self.heap.peek()
    }

    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sequence number the next push will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Iterate pending events in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEvent> {
        self.heap.iter()
    }
}
