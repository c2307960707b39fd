//! Staffing level input.
//!
//! A staffing level is a positive whole number of agents. Anything else
//! (empty input, text, zero, negative numbers) falls back to
//! [`DEFAULT_NUM_AGENTS`] with a warning instead of failing the process.

use call_center_sim_core::DEFAULT_NUM_AGENTS;
use std::io::{self, BufRead, Write};
use tracing::warn;

pub const PROMPT: &str = "Enter number of agents: ";

/// Parse a staffing level, ignoring surrounding whitespace.
pub fn parse_staffing_level(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

/// Parse `input`, substituting the default (and saying so on `out`) when it
/// is not a positive integer.
pub fn staffing_or_default<W: Write>(input: &str, out: &mut W) -> io::Result<usize> {
    match parse_staffing_level(input) {
        Some(n) => Ok(n),
        None => {
            warn!(input = input.trim(), default = DEFAULT_NUM_AGENTS, "invalid staffing level");
            writeln!(
                out,
                "Invalid input. Using default: {} agents.",
                DEFAULT_NUM_AGENTS
            )?;
            Ok(DEFAULT_NUM_AGENTS)
        }
    }
}

/// Ask for the staffing level interactively.
///
/// End of input counts as invalid input.
pub fn prompt_staffing_level<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<usize> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    staffing_or_default(&line, out)
}
