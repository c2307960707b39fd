//! PyO3 wrapper for Orchestrator
//!
//! This module provides the Python interface to the Rust orchestrator.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{parse_run_config, run_result_to_py, run_statistics_to_py};
use crate::orchestrator::Orchestrator as RustOrchestrator;

fn runtime_error(context: &str, e: impl std::fmt::Display) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{}: {}", context, e))
}

/// Python wrapper for Rust Orchestrator
///
/// # Example (from Python)
///
/// ```python
/// from call_center_sim_core import Simulation
///
/// sim = Simulation({"num_agents": 4, "rng_seed": 7})
/// result = sim.run()
/// print(f"{result['total_calls']} calls, utilization {result['utilization']}")
/// ```
#[pyclass(name = "Simulation", unsendable)]
pub struct PySimulation {
    inner: RustOrchestrator,
}

#[pymethods]
impl PySimulation {
    /// Create a new simulation from a configuration dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if a value has the wrong type or is out of range.
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_run_config(config)?;
        let inner = RustOrchestrator::new(rust_config)
            .map_err(|e| runtime_error("Failed to create simulation", e))?;
        Ok(PySimulation { inner })
    }

    /// Run to the horizon and return the rounded result record
    fn run(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let result = self
            .inner
            .run()
            .map_err(|e| runtime_error("Simulation failed", e))?;
        run_result_to_py(py, &result)
    }

    /// Fire all events up to `until` (capped at the horizon)
    fn run_until(&mut self, until: f64) -> PyResult<()> {
        self.inner
            .run_until(until)
            .map_err(|e| runtime_error("Simulation failed", e))
    }

    /// Unrounded statistics of the run so far
    fn statistics(&self, py: Python) -> PyResult<Py<PyDict>> {
        run_statistics_to_py(py, &self.inner.statistics())
    }

    /// Current simulated time
    fn now(&self) -> f64 {
        self.inner.now()
    }

    /// Number of calls waiting for an agent
    fn calls_waiting(&self) -> usize {
        self.inner.calls_waiting()
    }

    /// Serialize the full state to a JSON string
    fn save_state(&self) -> PyResult<String> {
        self.inner
            .save_state()
            .map_err(|e| runtime_error("Failed to save state", e))
    }

    /// Restore a simulation from `save_state` output
    #[staticmethod]
    fn load_state(config: &Bound<'_, PyDict>, state_json: &str) -> PyResult<Self> {
        let rust_config = parse_run_config(config)?;
        let inner = RustOrchestrator::load_state(rust_config, state_json)
            .map_err(|e| runtime_error("Failed to load state", e))?;
        Ok(PySimulation { inner })
    }
}
