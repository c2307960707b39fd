//! Result reporting: the console summary and the append-only CSV table.

use call_center_sim_core::{RunResult, RunStatistics};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_OUTPUT: &str = "call_center_results.csv";

pub const CSV_HEADER: [&str; 6] = [
    "Num_Agents",
    "Average_Wait(min)",
    "Average_Queue_Length",
    "Throughput(calls/min)",
    "Utilization",
    "Total_Calls",
];

const RULE: &str = "------------------------------------------------------";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An average as it appears in the table
///
/// Averages over no samples, and queue-length averages that come out whole,
/// are written as integers (`0`, `2`); everything else as a float (`0.0`,
/// `2.5`).
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
enum Average {
    Whole(u64),
    Real(f64),
}

/// One CSV data row, in header order
#[derive(Serialize)]
struct CsvRow {
    num_agents: usize,
    avg_wait_minutes: Average,
    avg_queue_length: Average,
    throughput_per_minute: f64,
    utilization: f64,
    total_calls: usize,
}

impl From<&RunStatistics> for CsvRow {
    fn from(stats: &RunStatistics) -> Self {
        let result = RunResult::from(stats);

        // Wait samples are fractional minutes; only an empty series is whole.
        let avg_wait_minutes = if stats.total_calls == 0 {
            Average::Whole(0)
        } else {
            Average::Real(result.avg_wait_minutes)
        };
        // Queue samples are counts, so their mean is whole whenever it divides.
        let avg_queue_length = if stats.avg_queue.fract() == 0.0 {
            Average::Whole(stats.avg_queue as u64)
        } else {
            Average::Real(result.avg_queue_length)
        };

        Self {
            num_agents: result.num_agents,
            avg_wait_minutes,
            avg_queue_length,
            throughput_per_minute: result.throughput_per_minute,
            utilization: result.utilization,
            total_calls: result.total_calls,
        }
    }
}

pub fn write_summary<W: Write>(out: &mut W, result: &RunResult) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Results for {} Agents:", result.num_agents)?;
    writeln!(out, "Average Wait (min): {:.2}", result.avg_wait_minutes)?;
    writeln!(out, "Average Queue Length: {:.2}", result.avg_queue_length)?;
    writeln!(out, "Throughput (calls/min): {:.2}", result.throughput_per_minute)?;
    writeln!(out, "Utilization: {:.3}", result.utilization)?;
    writeln!(out, "Total Calls Arrived: {}", result.total_calls)?;
    writeln!(out, "{}", RULE)?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, result: &RunResult) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)?;
    Ok(())
}

/// Append one row for the run to the CSV table at `path`.
///
/// Values are rounded as in [`RunResult`]. The header is written only when
/// the file does not exist yet.
pub fn append_csv(path: &Path, stats: &RunStatistics) -> Result<(), ReportError> {
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer.write_record(CSV_HEADER)?;
    }
    writer.serialize(CsvRow::from(stats))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_result() -> RunResult {
        RunResult {
            num_agents: 3,
            avg_wait_minutes: 1.25,
            avg_queue_length: 0.5,
            throughput_per_minute: 0.48,
            utilization: 0.912,
            total_calls: 231,
        }
    }

    fn sample_stats() -> RunStatistics {
        RunStatistics {
            num_agents: 3,
            avg_wait: 1.25,
            avg_queue: 0.5,
            throughput: 231.0 / 480.0,
            utilization: 0.9123,
            total_calls: 231,
            max_wait: 9.0,
            calls_arrived: 240,
        }
    }

    fn empty_stats() -> RunStatistics {
        RunStatistics {
            num_agents: 3,
            avg_wait: 0.0,
            avg_queue: 0.0,
            throughput: 0.0,
            utilization: 0.0,
            total_calls: 0,
            max_wait: 0.0,
            calls_arrived: 0,
        }
    }

    fn single_row(stats: &RunStatistics) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        append_csv(&path, stats).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        contents.lines().nth(1).unwrap().to_string()
    }

    #[test]
    fn test_summary_block() {
        let mut out = Vec::new();
        write_summary(&mut out, &sample_result()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "Results for 3 Agents:");
        assert_eq!(lines[2], "Average Wait (min): 1.25");
        assert_eq!(lines[3], "Average Queue Length: 0.50");
        assert_eq!(lines[4], "Throughput (calls/min): 0.48");
        assert_eq!(lines[5], "Utilization: 0.912");
        assert_eq!(lines[6], "Total Calls Arrived: 231");
        assert_eq!(lines[7], RULE);
    }

    #[test]
    fn test_json_output_parses_back() {
        let mut out = Vec::new();
        write_json(&mut out, &sample_result()).unwrap();

        let parsed: RunResult = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, sample_result());
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        append_csv(&path, &sample_stats()).unwrap();
        append_csv(
            &path,
            &RunStatistics {
                num_agents: 4,
                ..sample_stats()
            },
        )
        .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Num_Agents,Average_Wait(min),Average_Queue_Length,Throughput(calls/min),Utilization,Total_Calls"
        );
        assert_eq!(lines[1], "3,1.25,0.5,0.48,0.912,231");
        assert!(lines[2].starts_with("4,"));
    }

    #[test]
    fn test_existing_file_gets_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "").unwrap();

        append_csv(&path, &sample_stats()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(!contents.contains("Num_Agents"));
    }

    #[test]
    fn test_empty_run_writes_whole_averages() {
        assert_eq!(single_row(&empty_stats()), "3,0,0,0.0,0.0,0");
    }

    #[test]
    fn test_whole_queue_average_written_as_integer() {
        let stats = RunStatistics {
            avg_wait: 2.0,
            avg_queue: 2.0,
            ..sample_stats()
        };
        assert_eq!(single_row(&stats), "3,2.0,2,0.48,0.912,231");
    }

    #[test]
    fn test_row_uses_half_even_rounding() {
        let stats = RunStatistics {
            avg_queue: 0.125,
            utilization: 0.0625,
            ..sample_stats()
        };
        assert_eq!(single_row(&stats), "3,1.25,0.12,0.48,0.062,231");
    }
}
