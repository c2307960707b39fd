//! Call center staffing simulator
//!
//! Runs one shift of the call center with the requested number of agents,
//! prints the summary and appends it to a CSV table so staffing levels can
//! be compared across runs.

mod config;
mod input;
mod report;

use call_center_sim_core::{Orchestrator, RunConfig};
use clap::Parser;
use config::{load_config, Overrides};
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Call center staffing simulator", long_about = None)]
struct Cli {
    /// Number of agents; prompted for when omitted
    #[arg(allow_negative_numbers = true)]
    agents: Option<String>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Calls per minute
    #[arg(long)]
    arrival_rate: Option<f64>,

    /// Mean service time in minutes
    #[arg(long)]
    mean_service: Option<f64>,

    /// Simulated minutes to run
    #[arg(long)]
    horizon: Option<f64>,

    /// JSON run configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV table the result is appended to
    #[arg(short, long, default_value = report::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Do not append the result to the CSV table
    #[arg(long)]
    no_save: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            arrival_rate: self.arrival_rate,
            mean_service: self.mean_service,
            horizon: self.horizon,
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Staffing level from the argument, the config file, or the prompt, in
/// that order.
fn staffing_level(cli: &Cli, config: &RunConfig) -> io::Result<usize> {
    let mut stdout = io::stdout();
    match (&cli.agents, &cli.config) {
        (Some(arg), _) => input::staffing_or_default(arg, &mut stdout),
        (None, Some(_)) => Ok(config.num_agents),
        (None, None) => input::prompt_staffing_level(&mut io::stdin().lock(), &mut stdout),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };
    cli.overrides().apply(&mut config);
    config.num_agents = staffing_level(&cli, &config)?;
    config.validate()?;

    info!(
        agents = config.num_agents,
        arrival_rate = config.arrival_rate,
        mean_service = config.mean_service,
        horizon = config.horizon,
        seed = config.rng_seed,
        "starting run"
    );

    let mut orchestrator = Orchestrator::new(config)?;
    let result = orchestrator.run()?;
    debug!(
        calls_waiting = orchestrator.calls_waiting(),
        calls_in_service = orchestrator.calls_in_service(),
        "run finished"
    );

    let mut stdout = io::stdout().lock();
    if cli.json {
        report::write_json(&mut stdout, &result)?;
    } else {
        report::write_summary(&mut stdout, &result)?;
    }

    if !cli.no_save {
        report::append_csv(&cli.output, &orchestrator.statistics())?;
        info!(path = %cli.output.display(), "results saved");
        if !cli.json {
            writeln!(stdout, "✅ Results saved to '{}'\n", cli.output.display())?;
        }
    }
    Ok(())
}
