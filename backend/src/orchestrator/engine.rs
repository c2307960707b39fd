//! Orchestrator Engine
//!
//! Drives the discrete-event simulation of the call center:
//!
//! ```text
//! t = 0: spawn the arrival generator
//! loop:
//!   1. Pop the earliest event due at or before the horizon
//!      (ties fire in scheduling order)
//!   2. Advance the clock to its wake time
//!   3. Resume the task until its next suspension point
//!   4. Re-schedule it (timer), park it (resource) or drop it (terminated)
//! stop when the queue is empty or the next event lies past the horizon
//! ```
//!
//! Tasks still waiting for an agent or in service when the horizon is reached
//! are abandoned, not drained: their pending wake-ups simply never fire.
//!
//! # Example
//!
//! ```rust
//! use call_center_sim_core::orchestrator::{Orchestrator, RunConfig};
//!
//! let config = RunConfig {
//!     num_agents: 2,
//!     horizon: 60.0,
//!     ..RunConfig::default()
//! };
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! let result = orchestrator.run().unwrap();
//! println!("{} calls served, utilization {:.3}", result.total_calls, result.utilization);
//! ```

use crate::arrivals::{ArrivalConfig, ArrivalGenerator};
use crate::metrics::{MetricsCollector, RunResult, RunStatistics};
use crate::models::event::EventLog;
use crate::models::resource::{ResourceError, ResourcePool};
use crate::models::task::{Task, TaskId, TaskKind, TaskState};
use crate::process::{ProcessContext, Suspend};
use crate::rng::{RandomSource, RngManager};
use crate::scheduler::{Scheduler, SchedulerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

// ============================================================================
// Configuration
// ============================================================================

/// Staffing level used when none is supplied
pub const DEFAULT_NUM_AGENTS: usize = 3;

/// Immutable parameters of one run
///
/// Times are in minutes. Missing fields take the defaults of an 8-hour shift
/// with 30 calls per hour and a 6-minute mean handling time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of agents (resource capacity)
    pub num_agents: usize,

    /// Arrival rate λ in calls per minute
    pub arrival_rate: f64,

    /// Mean service time in minutes
    pub mean_service: f64,

    /// Simulated time at which the run stops
    pub horizon: f64,

    /// RNG seed for deterministic simulation
    pub rng_seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_agents: DEFAULT_NUM_AGENTS,
            arrival_rate: 30.0 / 60.0,
            mean_service: 6.0,
            horizon: 8.0 * 60.0,
            rng_seed: 42,
        }
    }
}

impl RunConfig {
    /// Reject configurations that would fail mid-run.
    ///
    /// A horizon of zero is accepted and yields an empty run.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_agents == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_agents must be > 0".to_string(),
            ));
        }
        if !(self.arrival_rate.is_finite() && self.arrival_rate > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "arrival_rate must be positive and finite, got {}",
                self.arrival_rate
            )));
        }
        if !(self.mean_service.is_finite() && self.mean_service > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "mean_service must be positive and finite, got {}",
                self.mean_service
            )));
        }
        if !(self.horizon.is_finite() && self.horizon >= 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "horizon must be non-negative and finite, got {}",
                self.horizon
            )));
        }
        Ok(())
    }

    pub fn arrival_config(&self) -> ArrivalConfig {
        ArrivalConfig {
            rate_per_minute: self.arrival_rate,
            mean_service_minutes: self.mean_service,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Simulation error types
///
/// `InvalidConfig` is raised before a run starts. Every other variant means
/// the engine broke one of its own invariants and the run is aborted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Scheduling error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Random source produced invalid sample: {0}")]
    InvalidSample(f64),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    StateValidationError(String),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Main orchestrator owning all simulation state
///
/// # Determinism
///
/// All randomness comes from the owned random source (seeded xorshift64* by
/// default). Same seed + same config = identical results.
pub struct Orchestrator<R = RngManager> {
    pub(super) config: RunConfig,
    pub(super) scheduler: Scheduler,
    pub(super) pool: ResourcePool,
    pub(super) tasks: BTreeMap<TaskId, Task>,
    pub(super) rng: R,
    pub(super) metrics: MetricsCollector,
    pub(super) event_log: EventLog,
    pub(super) next_task_id: u64,
}

impl Orchestrator<RngManager> {
    /// Create an orchestrator drawing from a xorshift RNG seeded with
    /// `config.rng_seed`.
    pub fn new(config: RunConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_source(config, rng)
    }
}

impl<R: RandomSource> Orchestrator<R> {
    /// Create an orchestrator drawing from an arbitrary random source.
    ///
    /// The arrival generator is spawned and scheduled at time zero.
    pub fn with_source(config: RunConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;

        let pool = ResourcePool::new(config.num_agents)?;
        let mut scheduler = Scheduler::new();
        let mut tasks = BTreeMap::new();

        let generator_id = TaskId(0);
        let generator = ArrivalGenerator::new(config.arrival_config());
        tasks.insert(
            generator_id,
            Task::new(generator_id, TaskKind::Generator(generator)),
        );
        scheduler.schedule(0.0, generator_id)?;

        Ok(Self {
            config,
            scheduler,
            pool,
            tasks,
            rng,
            metrics: MetricsCollector::new(),
            event_log: EventLog::new(),
            next_task_id: 1,
        })
    }

    /// Run to the configured horizon and report the result.
    pub fn run(&mut self) -> Result<RunResult, SimulationError> {
        self.run_until(self.config.horizon)?;
        Ok(RunResult::from(&self.statistics()))
    }

    /// Fire every event due at or before `until`, capped at the horizon.
    ///
    /// Can be called repeatedly with increasing times; a time earlier than the
    /// current clock fires nothing.
    pub fn run_until(&mut self, until: f64) -> Result<(), SimulationError> {
        let limit = until.min(self.config.horizon);
        let fired_before = self.scheduler.fired();
        debug!(
            from = self.scheduler.now(),
            until = limit,
            pending = self.scheduler.pending(),
            "running simulation"
        );

        while let Some(event) = self.scheduler.pop_due(limit)? {
            trace!(
                time = event.wake_time,
                seq = event.sequence,
                task = %event.task,
                "firing event"
            );
            self.resume(event.task)?;
        }

        debug!(
            now = self.scheduler.now(),
            fired = self.scheduler.fired() - fired_before,
            calls_served = self.metrics.service_times().len(),
            queue_len = self.pool.queue_len(),
            "simulation paused"
        );
        Ok(())
    }

    fn resume(&mut self, id: TaskId) -> Result<(), SimulationError> {
        let mut task = self
            .tasks
            .remove(&id)
            .ok_or(SimulationError::TaskNotFound(id))?;

        let mut ctx = ProcessContext {
            current: id,
            scheduler: &mut self.scheduler,
            pool: &mut self.pool,
            tasks: &mut self.tasks,
            rng: &mut self.rng,
            metrics: &mut self.metrics,
            event_log: &mut self.event_log,
            next_task_id: &mut self.next_task_id,
        };
        let suspend = task.resume(&mut ctx)?;

        match suspend {
            Suspend::Timer(delay) => {
                self.scheduler.schedule_after(delay, id)?;
                self.tasks.insert(id, task);
            }
            Suspend::Resource => {
                self.tasks.insert(id, task);
            }
            Suspend::Terminated => {}
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Unrounded statistics of the run so far
    pub fn statistics(&self) -> RunStatistics {
        self.metrics
            .summarize(self.config.num_agents, self.config.horizon)
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Number of live tasks (generator included)
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Calls parked in the wait-queue
    pub fn calls_waiting(&self) -> usize {
        self.count_calls(TaskState::WaitingOnResource)
    }

    /// Calls currently being served
    pub fn calls_in_service(&self) -> usize {
        self.count_calls(TaskState::WaitingOnTimer)
    }

    fn count_calls(&self, state: TaskState) -> usize {
        self.tasks
            .values()
            .filter(|t| t.is_call() && t.state() == state)
            .count()
    }

    /// Whether no further event can fire before the horizon
    pub fn is_finished(&self) -> bool {
        match self.scheduler.next_wake_time() {
            Some(t) => t > self.config.horizon,
            None => true,
        }
    }
}
