//! Run statistics.
//!
//! The collector only appends samples while the run is in progress; all
//! aggregation happens once the run has halted.
//!
//! ```text
//! avg_wait    = mean(wait_times)                        (0 if empty)
//! avg_queue   = mean(queue_length_samples)              (0 if empty)
//! throughput  = count(service_times) / horizon
//! utilization = sum(service_times) / (agents × horizon)
//! ```
//!
//! Throughput and utilization are 0 when the horizon is 0.

use serde::{Deserialize, Serialize};

/// Append-only sample series gathered during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsCollector {
    wait_times: Vec<f64>,
    service_times: Vec<f64>,
    queue_length_samples: Vec<usize>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_wait(&mut self, wait: f64) {
        self.wait_times.push(wait);
    }

    pub fn record_service(&mut self, service_time: f64) {
        self.service_times.push(service_time);
    }

    pub fn record_queue_length(&mut self, queue_length: usize) {
        self.queue_length_samples.push(queue_length);
    }

    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    pub fn service_times(&self) -> &[f64] {
        &self.service_times
    }

    pub fn queue_length_samples(&self) -> &[usize] {
        &self.queue_length_samples
    }

    /// Aggregate the series into unrounded statistics.
    pub fn summarize(&self, num_agents: usize, horizon: f64) -> RunStatistics {
        let total_calls = self.service_times.len();
        let busy_time: f64 = self.service_times.iter().sum();

        let (throughput, utilization) = if horizon > 0.0 && num_agents > 0 {
            (
                total_calls as f64 / horizon,
                busy_time / (num_agents as f64 * horizon),
            )
        } else {
            (0.0, 0.0)
        };

        RunStatistics {
            num_agents,
            avg_wait: mean(self.wait_times.iter().copied()),
            avg_queue: mean(self.queue_length_samples.iter().map(|&n| n as f64)),
            throughput,
            utilization,
            total_calls,
            max_wait: self.wait_times.iter().copied().fold(0.0, f64::max),
            calls_arrived: self.queue_length_samples.len(),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Round to `decimals` places, halves to even, judged on the exact binary
/// value: 0.125 → 0.12 but 2.675 (stored as 2.67499…) → 2.67.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let scaled = value * scale;
    if (scaled - scaled.trunc()).abs() != 0.5 {
        return scaled.round() / scale;
    }

    // The product may have been rounded onto the tie; the fused residual
    // value * scale - scaled is exact and tells which side it came from.
    let residual = value.mul_add(scale, -scaled);
    let rounded = if residual > 0.0 {
        scaled.ceil()
    } else if residual < 0.0 {
        scaled.floor()
    } else {
        scaled.round_ties_even()
    };
    rounded / scale
}

/// Unrounded statistics of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub num_agents: usize,
    pub avg_wait: f64,
    pub avg_queue: f64,
    pub throughput: f64,
    pub utilization: f64,
    /// Calls admitted to service before the horizon
    pub total_calls: usize,
    pub max_wait: f64,
    /// Calls that arrived before the horizon, admitted or not
    pub calls_arrived: usize,
}

/// Record handed to reporting: one per completed run
///
/// Values are rounded the way they are reported: two decimals for wait,
/// queue length and throughput, three for utilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub num_agents: usize,
    pub avg_wait_minutes: f64,
    pub avg_queue_length: f64,
    pub throughput_per_minute: f64,
    pub utilization: f64,
    pub total_calls: usize,
}

impl From<&RunStatistics> for RunResult {
    fn from(stats: &RunStatistics) -> Self {
        Self {
            num_agents: stats.num_agents,
            avg_wait_minutes: round_to(stats.avg_wait, 2),
            avg_queue_length: round_to(stats.avg_queue, 2),
            throughput_per_minute: round_to(stats.throughput, 2),
            utilization: round_to(stats.utilization, 3),
            total_calls: stats.total_calls,
        }
    }
}
