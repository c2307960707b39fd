//! Run configuration from a JSON file plus command-line overrides.

use call_center_sim_core::RunConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a run configuration. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Values given on the command line, each replacing the file/default value
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub arrival_rate: Option<f64>,
    pub mean_service: Option<f64>,
    pub horizon: Option<f64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        if let Some(rate) = self.arrival_rate {
            config.arrival_rate = rate;
        }
        if let Some(mean) = self.mean_service {
            config.mean_service = mean;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
    }
}
