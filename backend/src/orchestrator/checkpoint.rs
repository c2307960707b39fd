//! Checkpoint - Save/Load Simulation State
//!
//! Serializes the complete orchestrator state to JSON so a run can be paused
//! and resumed. A resumed run fires exactly the same events, in the same
//! order, with the same random draws, as an uninterrupted one.
//!
//! # Critical Invariants
//!
//! - **Determinism**: save at t, load, run to the horizon → identical result
//! - **Capacity**: `in_use <= capacity` and one outstanding ticket per unit
//! - **Queue Integrity**: every queued requester is a live call waiting on
//!   the pool, listed once
//! - **Config Matching**: state can only be loaded with matching config

use crate::metrics::MetricsCollector;
use crate::models::event::EventLog;
use crate::models::resource::ResourcePool;
use crate::models::task::{Task, TaskId, TaskState};
use crate::orchestrator::engine::{Orchestrator, RunConfig, SimulationError};
use crate::rng::RngManager;
use crate::scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete orchestrator state snapshot
#[derive(Debug, Deserialize)]
pub struct StateSnapshot {
    /// SHA256 hash of the config the run was started with
    pub config_hash: String,

    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,

    pub scheduler: Scheduler,
    pub pool: ResourcePool,
    pub tasks: Vec<Task>,
    pub metrics: MetricsCollector,
    pub event_log: EventLog,
    pub next_task_id: u64,
}

/// Borrowed view written by `save_state`; field names match [`StateSnapshot`]
#[derive(Serialize)]
struct SnapshotRef<'a> {
    config_hash: String,
    rng_state: u64,
    scheduler: &'a Scheduler,
    pool: &'a ResourcePool,
    tasks: Vec<&'a Task>,
    metrics: &'a MetricsCollector,
    event_log: &'a EventLog,
    next_task_id: u64,
}

impl Orchestrator<RngManager> {
    /// Serialize the full simulation state to a JSON string.
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = SnapshotRef {
            config_hash: compute_config_hash(&self.config)?,
            rng_state: self.rng.get_state(),
            scheduler: &self.scheduler,
            pool: &self.pool,
            tasks: self.tasks.values().collect(),
            metrics: &self.metrics,
            event_log: &self.event_log,
            next_task_id: self.next_task_id,
        };

        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot serialization failed: {}", e))
        })
    }

    /// Restore an orchestrator from a snapshot produced by `save_state`.
    ///
    /// `config` must be the configuration the snapshot was taken under.
    pub fn load_state(config: RunConfig, state_json: &str) -> Result<Self, SimulationError> {
        config.validate()?;

        let snapshot: StateSnapshot = serde_json::from_str(state_json).map_err(|e| {
            SimulationError::SerializationError(format!("Snapshot deserialization failed: {}", e))
        })?;

        let expected_hash = compute_config_hash(&config)?;
        if snapshot.config_hash != expected_hash {
            return Err(SimulationError::StateValidationError(format!(
                "Config mismatch: snapshot was taken with config {}, got {}",
                snapshot.config_hash, expected_hash
            )));
        }

        validate_snapshot(&snapshot, &config)?;

        let tasks: BTreeMap<TaskId, Task> = snapshot
            .tasks
            .into_iter()
            .map(|task| (task.id(), task))
            .collect();

        Ok(Self {
            config,
            scheduler: snapshot.scheduler,
            pool: snapshot.pool,
            tasks,
            rng: RngManager::new(snapshot.rng_state),
            metrics: snapshot.metrics,
            event_log: snapshot.event_log,
            next_task_id: snapshot.next_task_id,
        })
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Uses canonical JSON serialization with sorted keys so the hash does not
/// depend on field order.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    // Recursively sort all object keys for canonical representation
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate state snapshot integrity
///
/// Checks critical invariants:
/// - Pool capacity matches the config and is not exceeded
/// - Outstanding tickets match units in use
/// - Queued requesters are live calls waiting on the pool, each listed once
/// - Every pending event refers to a live task and is not in the past
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    config: &RunConfig,
) -> Result<(), SimulationError> {
    let pool = &snapshot.pool;

    // 1. Capacity
    if pool.capacity() != config.num_agents {
        return Err(SimulationError::StateValidationError(format!(
            "Pool capacity {} does not match num_agents {}",
            pool.capacity(),
            config.num_agents
        )));
    }
    if pool.in_use() > pool.capacity() {
        return Err(SimulationError::StateValidationError(format!(
            "Pool over-booked: {} in use, capacity {}",
            pool.in_use(),
            pool.capacity()
        )));
    }
    if pool.outstanding_tickets() != pool.in_use() {
        return Err(SimulationError::StateValidationError(format!(
            "{} outstanding tickets for {} units in use",
            pool.outstanding_tickets(),
            pool.in_use()
        )));
    }

    // 2. Queue integrity
    let tasks: BTreeMap<TaskId, &Task> = snapshot.tasks.iter().map(|t| (t.id(), t)).collect();
    let mut seen = BTreeSet::new();
    for requester in pool.waiting() {
        if !seen.insert(requester) {
            return Err(SimulationError::StateValidationError(format!(
                "Duplicate requester {} in wait-queue",
                requester
            )));
        }
        match tasks.get(&requester) {
            Some(task) if task.is_call() && task.state() == TaskState::WaitingOnResource => {}
            Some(task) => {
                return Err(SimulationError::StateValidationError(format!(
                    "Queued requester {} is in state {:?}",
                    requester,
                    task.state()
                )))
            }
            None => {
                return Err(SimulationError::StateValidationError(format!(
                    "Orphaned requester in wait-queue: {}",
                    requester
                )))
            }
        }
    }

    // 3. Pending events
    let now = snapshot.scheduler.now();
    for event in snapshot.scheduler.queue().iter() {
        if !tasks.contains_key(&event.task) {
            return Err(SimulationError::StateValidationError(format!(
                "Pending event for unknown task {}",
                event.task
            )));
        }
        if event.wake_time < now {
            return Err(SimulationError::StateValidationError(format!(
                "Pending event for {} at {} is before current time {}",
                event.task, event.wake_time, now
            )));
        }
    }

    Ok(())
}
