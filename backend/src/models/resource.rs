//! Finite-capacity resource with FIFO admission.
//!
//! Models the pool of agents calls compete for. A requester is admitted at
//! once when a unit is free; otherwise it joins the back of the wait-queue.
//!
//! # Hand-off on release
//!
//! When a unit is released while requesters are waiting, the unit passes
//! straight to the head of the wait-queue: the head leaves the queue at the
//! release instant and its grant is held for it until it resumes and calls
//! [`ResourcePool::request`] again. A call arriving at the same instant can
//! therefore never overtake a queued one.
//!
//! # Critical Invariants
//!
//! 1. `in_use <= capacity` at all times
//! 2. Exactly one outstanding ticket per admitted requester (`in_use` tickets)
//! 3. A requester appears in the wait-queue at most once, and never while
//!    holding or being handed a unit

use crate::models::task::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error;

/// Errors raised by the resource pool
///
/// Every variant is an engine invariant violation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Ticket {0} is not currently held")]
    InvalidRelease(u64),

    #[error("Task {0} is already waiting for an agent")]
    AlreadyQueued(TaskId),

    #[error("Resource capacity must be positive")]
    ZeroCapacity,
}

/// Proof of one granted unit of capacity.
///
/// Tickets cannot be cloned; releasing one consumes it.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: u64,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Outcome of a request
#[derive(Debug, PartialEq)]
pub enum Admission {
    /// A unit was granted
    Granted(Ticket),
    /// The requester joined the wait-queue at `position` (0 = head)
    Queued { position: usize },
}

/// Pool of interchangeable servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    capacity: usize,
    in_use: usize,
    wait_queue: VecDeque<TaskId>,
    /// Units released to a waiting requester that has not resumed yet
    handed_off: BTreeMap<TaskId, u64>,
    outstanding: BTreeSet<u64>,
    next_ticket: u64,
}

impl ResourcePool {
    /// Create a pool with `capacity` units.
    ///
    /// # Example
    /// ```
    /// use call_center_sim_core::models::{Admission, ResourcePool, TaskId};
    ///
    /// let mut pool = ResourcePool::new(1).unwrap();
    /// let ticket = match pool.request(TaskId(1)).unwrap() {
    ///     Admission::Granted(ticket) => ticket,
    ///     Admission::Queued { .. } => unreachable!(),
    /// };
    /// assert_eq!(pool.request(TaskId(2)).unwrap(), Admission::Queued { position: 0 });
    ///
    /// // Releasing hands the unit to the waiting task
    /// assert_eq!(pool.release(ticket).unwrap(), Some(TaskId(2)));
    /// assert_eq!(pool.in_use(), 1);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ResourceError> {
        if capacity == 0 {
            return Err(ResourceError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            in_use: 0,
            wait_queue: VecDeque::new(),
            handed_off: BTreeMap::new(),
            outstanding: BTreeSet::new(),
            next_ticket: 0,
        })
    }

    /// Request one unit on behalf of `requester`.
    ///
    /// Returns `Granted` immediately when a unit is free or was handed to this
    /// requester by an earlier release; otherwise appends it to the wait-queue.
    pub fn request(&mut self, requester: TaskId) -> Result<Admission, ResourceError> {
        if let Some(id) = self.handed_off.remove(&requester) {
            return Ok(Admission::Granted(Ticket { id }));
        }
        if self.wait_queue.contains(&requester) {
            return Err(ResourceError::AlreadyQueued(requester));
        }
        if self.in_use < self.capacity {
            self.in_use += 1;
            return Ok(Admission::Granted(self.issue()));
        }
        self.wait_queue.push_back(requester);
        Ok(Admission::Queued {
            position: self.wait_queue.len() - 1,
        })
    }

    /// Release a unit.
    ///
    /// Returns the requester that received the freed unit, if any; the caller
    /// is responsible for resuming it.
    pub fn release(&mut self, ticket: Ticket) -> Result<Option<TaskId>, ResourceError> {
        if !self.outstanding.remove(&ticket.id) {
            return Err(ResourceError::InvalidRelease(ticket.id));
        }
        self.in_use -= 1;

        let Some(next) = self.wait_queue.pop_front() else {
            return Ok(None);
        };
        self.in_use += 1;
        let handed = self.issue();
        self.handed_off.insert(next, handed.id);
        Ok(Some(next))
    }

    fn issue(&mut self) -> Ticket {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.outstanding.insert(id);
        Ticket { id }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Units currently granted, including units handed to requesters that
    /// have not resumed yet
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn available(&self) -> usize {
        self.capacity - self.in_use
    }

    /// Number of requesters waiting for a unit
    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    /// Waiting requesters, head first
    pub fn waiting(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.wait_queue.iter().copied()
    }

    /// Requesters holding a handed-off unit they have not claimed yet
    pub fn pending_handoffs(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.handed_off.keys().copied()
    }

    /// Number of tickets not yet released
    pub fn outstanding_tickets(&self) -> usize {
        self.outstanding.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(admission: Admission) -> Ticket {
        match admission {
            Admission::Granted(ticket) => ticket,
            other => panic!("expected grant, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ResourcePool::new(0).unwrap_err(), ResourceError::ZeroCapacity);
    }

    #[test]
    fn test_release_unknown_ticket_rejected() {
        let mut pool = ResourcePool::new(2).unwrap();
        let err = pool.release(Ticket { id: 99 }).unwrap_err();
        assert_eq!(err, ResourceError::InvalidRelease(99));
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_double_release_rejected() {
        let mut pool = ResourcePool::new(1).unwrap();
        let ticket = granted(pool.request(TaskId(1)).unwrap());
        let id = ticket.id();
        pool.release(ticket).unwrap();

        let forged = Ticket { id };
        assert_eq!(pool.release(forged).unwrap_err(), ResourceError::InvalidRelease(id));
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_duplicate_queue_entry_rejected() {
        let mut pool = ResourcePool::new(1).unwrap();
        let _held = granted(pool.request(TaskId(1)).unwrap());
        pool.request(TaskId(2)).unwrap();

        assert_eq!(
            pool.request(TaskId(2)).unwrap_err(),
            ResourceError::AlreadyQueued(TaskId(2))
        );
        assert_eq!(pool.queue_len(), 1);
    }

    #[test]
    fn test_handoff_claimed_on_next_request() {
        let mut pool = ResourcePool::new(1).unwrap();
        let first = granted(pool.request(TaskId(1)).unwrap());
        pool.request(TaskId(2)).unwrap();

        assert_eq!(pool.release(first).unwrap(), Some(TaskId(2)));
        assert_eq!(pool.queue_len(), 0);
        assert_eq!(pool.pending_handoffs().collect::<Vec<_>>(), vec![TaskId(2)]);

        // A newcomer at the same instant must not take the handed-off unit
        assert_eq!(pool.request(TaskId(3)).unwrap(), Admission::Queued { position: 0 });

        let second = granted(pool.request(TaskId(2)).unwrap());
        assert_eq!(pool.in_use(), 1);
        assert_eq!(pool.outstanding_tickets(), 1);
        assert_eq!(pool.release(second).unwrap(), Some(TaskId(3)));
    }
}
