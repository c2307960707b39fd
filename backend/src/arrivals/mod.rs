//! Arrival generation module for deterministic call creation.
//!
//! The arrival generator is itself a process: it sleeps for an exponentially
//! distributed inter-arrival interval, spawns a call, and goes back to sleep.
//! It never terminates on its own; the run ends when the scheduler declines to
//! fire its next wake-up because it lies beyond the horizon.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **Draw order**: the inter-arrival interval is drawn before the call it
//!    precedes is spawned
//! 3. **Poisson arrivals**: exponential gaps at rate λ
//!
//! # Example
//!
//! ```
//! use call_center_sim_core::arrivals::{ArrivalConfig, ArrivalGenerator};
//!
//! let config = ArrivalConfig {
//!     rate_per_minute: 0.5,
//!     mean_service_minutes: 6.0,
//! };
//! let generator = ArrivalGenerator::new(config);
//! assert_eq!(generator.calls_spawned(), 0);
//! ```

use crate::models::task::TaskKind;
use crate::orchestrator::SimulationError;
use crate::process::call::CallProcess;
use crate::process::{Process, ProcessContext, Suspend};
use serde::{Deserialize, Serialize};

/// Parameters of the arrival stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    /// Expected number of arrivals per minute (λ)
    pub rate_per_minute: f64,

    /// Mean service time handed to every spawned call (minutes)
    pub mean_service_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum GeneratorStep {
    /// Not yet started: only draw the first interval
    Start,
    /// Woken after an interval: spawn a call, then draw the next interval
    Fire,
}

/// Process producing calls at exponential intervals.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArrivalGenerator {
    config: ArrivalConfig,

    /// Next call number (1-based)
    next_call_id: u64,

    step: GeneratorStep,
}

impl ArrivalGenerator {
    pub fn new(config: ArrivalConfig) -> Self {
        Self {
            config,
            next_call_id: 1,
            step: GeneratorStep::Start,
        }
    }

    /// Number of calls spawned so far
    pub fn calls_spawned(&self) -> u64 {
        self.next_call_id - 1
    }

    pub fn config(&self) -> &ArrivalConfig {
        &self.config
    }

    fn spawn_call(&mut self, ctx: &mut ProcessContext<'_>) -> Result<(), SimulationError> {
        let call_id = format!("call_{:08}", self.next_call_id);
        self.next_call_id += 1;

        let call = CallProcess::new(call_id, 1.0 / self.config.mean_service_minutes);
        ctx.spawn(TaskKind::Call(call))?;
        Ok(())
    }
}

impl Process for ArrivalGenerator {
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> Result<Suspend, SimulationError> {
        match self.step {
            GeneratorStep::Start => self.step = GeneratorStep::Fire,
            GeneratorStep::Fire => self.spawn_call(ctx)?,
        }

        let interval = ctx.draw_exponential(self.config.rate_per_minute)?;
        Ok(Suspend::Timer(interval))
    }
}
