//! Domain models for the call center simulator

pub mod event;
pub mod resource;
pub mod task;

// Re-exports
pub use event::{Event, EventLog};
pub use resource::{Admission, ResourceError, ResourcePool, Ticket};
pub use task::{Task, TaskId, TaskKind, TaskState};
