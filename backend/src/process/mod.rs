//! Cooperative process runtime.
//!
//! Exactly one task runs at a time and runs uninterrupted until it returns a
//! [`Suspend`]. The orchestrator turns that value into scheduler state:
//!
//! ```text
//! Suspend::Timer(d)   → wake event at now + d       (WaitingOnTimer)
//! Suspend::Resource   → parked in the pool's queue   (WaitingOnResource)
//! Suspend::Terminated → task dropped
//! ```
//!
//! Everything a running process may touch is reached through
//! [`ProcessContext`]; the pool's `in_use` and wait-queue are only ever
//! mutated by the pool's own request/release operations.

pub mod call;

use crate::metrics::MetricsCollector;
use crate::models::event::{Event, EventLog};
use crate::models::resource::{Admission, ResourcePool, Ticket};
use crate::models::task::{Task, TaskId, TaskKind};
use crate::orchestrator::SimulationError;
use crate::rng::RandomSource;
use crate::scheduler::Scheduler;
use std::collections::BTreeMap;

/// Why a process stopped running
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Resume after the given delay
    Timer(f64),
    /// Resume when the pool hands this task a unit
    Resource,
    /// The process is finished
    Terminated,
}

/// A resumable simulation process
pub trait Process {
    /// Run from the current suspension point to the next one.
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> Result<Suspend, SimulationError>;
}

/// View of the engine handed to the running task.
pub struct ProcessContext<'a> {
    pub(crate) current: TaskId,
    pub(crate) scheduler: &'a mut Scheduler,
    pub(crate) pool: &'a mut ResourcePool,
    pub(crate) tasks: &'a mut BTreeMap<TaskId, Task>,
    pub(crate) rng: &'a mut dyn RandomSource,
    pub(crate) metrics: &'a mut MetricsCollector,
    pub(crate) event_log: &'a mut EventLog,
    pub(crate) next_task_id: &'a mut u64,
}

impl ProcessContext<'_> {
    /// Id of the task currently running
    pub fn current_task(&self) -> TaskId {
        self.current
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Draw from the exponential distribution with the given rate.
    ///
    /// Zero (of either sign) is rejected along with negative and non-finite
    /// samples: gaps and service durations are strictly positive.
    pub fn draw_exponential(&mut self, rate: f64) -> Result<f64, SimulationError> {
        let sample = self.rng.next_exponential(rate);
        if !(sample.is_finite() && sample > 0.0) {
            return Err(SimulationError::InvalidSample(sample));
        }
        Ok(sample)
    }

    /// Start a new task at the current instant.
    pub fn spawn(&mut self, kind: TaskKind) -> Result<TaskId, SimulationError> {
        let id = TaskId(*self.next_task_id);
        *self.next_task_id += 1;
        self.tasks.insert(id, Task::new(id, kind));
        let now = self.scheduler.now();
        self.scheduler.schedule(now, id)?;
        Ok(id)
    }

    /// Make a suspended task runnable at the current instant.
    pub fn wake(&mut self, task: TaskId) -> Result<(), SimulationError> {
        self.tasks
            .get_mut(&task)
            .ok_or(SimulationError::TaskNotFound(task))?
            .make_runnable();
        let now = self.scheduler.now();
        self.scheduler.schedule(now, task)?;
        Ok(())
    }

    /// Request an agent for the current task.
    pub fn request(&mut self) -> Result<Admission, SimulationError> {
        Ok(self.pool.request(self.current)?)
    }

    /// Release an agent, waking the next waiting task if it receives the unit.
    pub fn release(&mut self, ticket: Ticket) -> Result<Option<TaskId>, SimulationError> {
        let woken = self.pool.release(ticket)?;
        if let Some(next) = woken {
            self.wake(next)?;
        }
        Ok(woken)
    }

    /// Length of the pool's wait-queue right now
    pub fn queue_len(&self) -> usize {
        self.pool.queue_len()
    }

    pub fn metrics(&mut self) -> &mut MetricsCollector {
        &mut *self.metrics
    }

    pub fn log(&mut self, event: Event) {
        self.event_log.log(event);
    }
}
