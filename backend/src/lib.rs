//! Call Center Simulator Core - Rust Engine
//!
//! Discrete-event simulation of calls competing for a fixed pool of agents,
//! with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Simulation clock
//! - **scheduler**: Time-ordered event queue with FIFO tie-break
//! - **models**: Domain types (ResourcePool, Task, Event)
//! - **process**: Cooperative process runtime and the call lifecycle
//! - **arrivals**: Arrival generator process
//! - **metrics**: Sample collection and run statistics
//! - **orchestrator**: Main simulation loop and checkpoints
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Simulated time never moves backwards
//! 2. Events at equal times fire in scheduling order
//! 3. All randomness is deterministic (seeded RNG)
//! 4. `in_use <= capacity` and the wait-queue is strictly FIFO

// Module declarations
pub mod arrivals;
pub mod core;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod process;
pub mod rng;
pub mod scheduler;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, ArrivalGenerator};
pub use core::time::SimClock;
pub use metrics::{MetricsCollector, RunResult, RunStatistics};
pub use models::{
    event::{Event, EventLog},
    resource::{Admission, ResourceError, ResourcePool, Ticket},
    task::{Task, TaskId, TaskState},
};
pub use orchestrator::{Orchestrator, RunConfig, SimulationError, DEFAULT_NUM_AGENTS};
pub use rng::{RandomSource, RngManager};
pub use scheduler::{Scheduler, SchedulerError};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn call_center_sim_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::orchestrator::PySimulation>()?;
    Ok(())
}
