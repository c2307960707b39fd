//! Call lifecycle process
//!
//! ```text
//! Arrive ──request──► InService ──timer──► release ──► Done
//!    │                    ▲
//!    └─queued─► AwaitAdmission (woken by hand-off)
//! ```
//!
//! The queue length is sampled on arrival, before the call requests an
//! agent, so it reflects the congestion the arriving call sees and never
//! counts the call itself. The service duration is drawn at admission.

use crate::models::event::Event;
use crate::models::resource::{Admission, Ticket};
use crate::orchestrator::SimulationError;
use crate::process::{Process, ProcessContext, Suspend};
use serde::{Deserialize, Serialize};

/// Position of a call in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallStep {
    Arrive,
    AwaitAdmission,
    InService,
    Done,
}

/// One call competing for an agent
#[derive(Debug, Serialize, Deserialize)]
pub struct CallProcess {
    call_id: String,
    /// Rate of the service-duration distribution (1 / mean service time)
    service_rate: f64,
    arrival_time: f64,
    ticket: Option<Ticket>,
    step: CallStep,
}

impl CallProcess {
    pub fn new(call_id: String, service_rate: f64) -> Self {
        Self {
            call_id,
            service_rate,
            arrival_time: 0.0,
            ticket: None,
            step: CallStep::Arrive,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn step(&self) -> CallStep {
        self.step
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    /// Whether the call currently holds an agent
    pub fn holds_agent(&self) -> bool {
        self.ticket.is_some()
    }

    fn arrive(&mut self, ctx: &mut ProcessContext<'_>) -> Result<Suspend, SimulationError> {
        self.arrival_time = ctx.now();
        let queue_length = ctx.queue_len();
        ctx.metrics().record_queue_length(queue_length);
        ctx.log(Event::CallArrived {
            time: self.arrival_time,
            call_id: self.call_id.clone(),
            queue_length,
        });

        match ctx.request()? {
            Admission::Granted(ticket) => self.admit(ticket, ctx),
            Admission::Queued { position } => {
                ctx.log(Event::CallQueued {
                    time: self.arrival_time,
                    call_id: self.call_id.clone(),
                    position,
                });
                self.step = CallStep::AwaitAdmission;
                Ok(Suspend::Resource)
            }
        }
    }

    fn admit(
        &mut self,
        ticket: Ticket,
        ctx: &mut ProcessContext<'_>,
    ) -> Result<Suspend, SimulationError> {
        let now = ctx.now();
        let wait = now - self.arrival_time;
        if wait < 0.0 {
            return Err(SimulationError::InvariantViolation(format!(
                "{} admitted before it arrived (wait {})",
                self.call_id, wait
            )));
        }
        ctx.metrics().record_wait(wait);

        let service_time = ctx.draw_exponential(self.service_rate)?;
        ctx.metrics().record_service(service_time);

        ctx.log(Event::CallAdmitted {
            time: now,
            call_id: self.call_id.clone(),
            wait,
            service_time,
        });

        self.ticket = Some(ticket);
        self.step = CallStep::InService;
        Ok(Suspend::Timer(service_time))
    }

    fn complete(&mut self, ctx: &mut ProcessContext<'_>) -> Result<Suspend, SimulationError> {
        let ticket = self.ticket.take().ok_or_else(|| {
            SimulationError::InvariantViolation(format!(
                "{} finished service without holding an agent",
                self.call_id
            ))
        })?;
        ctx.release(ticket)?;
        ctx.log(Event::ServiceCompleted {
            time: ctx.now(),
            call_id: self.call_id.clone(),
        });
        self.step = CallStep::Done;
        Ok(Suspend::Terminated)
    }
}

impl Process for CallProcess {
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> Result<Suspend, SimulationError> {
        match self.step {
            CallStep::Arrive => self.arrive(ctx),
            CallStep::AwaitAdmission => match ctx.request()? {
                Admission::Granted(ticket) => self.admit(ticket, ctx),
                Admission::Queued { .. } => Err(SimulationError::InvariantViolation(format!(
                    "{} resumed without being handed an agent",
                    self.call_id
                ))),
            },
            CallStep::InService => self.complete(ctx),
            CallStep::Done => Err(SimulationError::InvariantViolation(format!(
                "{} resumed after termination",
                self.call_id
            ))),
        }
    }
}
