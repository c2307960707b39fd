//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict)

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::metrics::{RunResult, RunStatistics};
use crate::orchestrator::RunConfig;

/// Extract a field with a default value if missing.
///
/// # Errors
/// Returns error only if type conversion fails (not if field is missing)
fn extract_with_default<T>(dict: &Bound<'_, PyDict>, key: &str, default: T) -> PyResult<T>
where
    T: for<'py> FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => value.extract(),
        None => Ok(default),
    }
}

/// Convert Python dict to RunConfig
///
/// Missing keys fall back to `RunConfig::default()`.
///
/// # Errors
///
/// Returns PyValueError if a value has the wrong type or the resulting
/// configuration is invalid.
pub fn parse_run_config(py_config: &Bound<'_, PyDict>) -> PyResult<RunConfig> {
    let defaults = RunConfig::default();
    let config = RunConfig {
        num_agents: extract_with_default(py_config, "num_agents", defaults.num_agents)?,
        arrival_rate: extract_with_default(py_config, "arrival_rate", defaults.arrival_rate)?,
        mean_service: extract_with_default(py_config, "mean_service", defaults.mean_service)?,
        horizon: extract_with_default(py_config, "horizon", defaults.horizon)?,
        rng_seed: extract_with_default(py_config, "rng_seed", defaults.rng_seed)?,
    };

    config
        .validate()
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;
    Ok(config)
}

/// Convert RunResult to Python dict
pub fn run_result_to_py(py: Python, result: &RunResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("num_agents", result.num_agents)?;
    dict.set_item("avg_wait_minutes", result.avg_wait_minutes)?;
    dict.set_item("avg_queue_length", result.avg_queue_length)?;
    dict.set_item("throughput_per_minute", result.throughput_per_minute)?;
    dict.set_item("utilization", result.utilization)?;
    dict.set_item("total_calls", result.total_calls)?;
    Ok(dict.unbind())
}

/// Convert unrounded RunStatistics to Python dict
pub fn run_statistics_to_py(py: Python, stats: &RunStatistics) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("num_agents", stats.num_agents)?;
    dict.set_item("avg_wait", stats.avg_wait)?;
    dict.set_item("avg_queue", stats.avg_queue)?;
    dict.set_item("throughput", stats.throughput)?;
    dict.set_item("utilization", stats.utilization)?;
    dict.set_item("total_calls", stats.total_calls)?;
    dict.set_item("max_wait", stats.max_wait)?;
    dict.set_item("calls_arrived", stats.calls_arrived)?;
    Ok(dict.unbind())
}
