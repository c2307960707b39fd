//! Orchestrator - main simulation loop
//!
//! See `engine.rs` for the event loop and `checkpoint.rs` for save/load.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{Orchestrator, RunConfig, SimulationError, DEFAULT_NUM_AGENTS};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
