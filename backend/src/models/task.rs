//! Suspendable tasks driven by the scheduler.
//!
//! A task wraps one process (the arrival generator or a single call) together
//! with its scheduling state. Suspension points are explicit state
//! transitions rather than language-level yields, which keeps every task
//! plain data that can be checkpointed.

use crate::arrivals::ArrivalGenerator;
use crate::orchestrator::SimulationError;
use crate::process::call::CallProcess;
use crate::process::{Process, ProcessContext, Suspend};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique task identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task_{}", self.0)
    }
}

/// Scheduling state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Scheduled to resume at the current instant
    Runnable,
    /// Suspended until a timed wake-up
    WaitingOnTimer,
    /// Suspended in the resource wait-queue
    WaitingOnResource,
    /// Finished; removed from the task table
    Terminated,
}

/// The process a task runs
#[derive(Debug, Serialize, Deserialize)]
pub enum TaskKind {
    Generator(ArrivalGenerator),
    Call(CallProcess),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    state: TaskState,
    kind: TaskKind,
}

impl Task {
    pub fn new(id: TaskId, kind: TaskKind) -> Self {
        Self {
            id,
            state: TaskState::Runnable,
            kind,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, TaskKind::Call(_))
    }

    /// Run the task until its next suspension point and record the new state.
    pub fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> Result<Suspend, SimulationError> {
        self.state = TaskState::Runnable;
        let suspend = match &mut self.kind {
            TaskKind::Generator(generator) => generator.resume(ctx)?,
            TaskKind::Call(call) => call.resume(ctx)?,
        };
        self.state = match suspend {
            Suspend::Timer(_) => TaskState::WaitingOnTimer,
            Suspend::Resource => TaskState::WaitingOnResource,
            Suspend::Terminated => TaskState::Terminated,
        };
        Ok(suspend)
    }

    /// Mark a task woken by a resource hand-off.
    pub(crate) fn make_runnable(&mut self) {
        self.state = TaskState::Runnable;
    }
}
