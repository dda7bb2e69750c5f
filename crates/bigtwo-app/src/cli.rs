use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, EngineConfig, ValidationError};

/// Command-line front end for unattended Big Two rounds.
#[derive(Debug, Parser)]
#[command(
    name = "bigtwo",
    author,
    version,
    about = "Deterministic Big Two round simulator"
)]
pub struct Cli {
    /// Path to the YAML configuration file. Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of rounds to play.
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pub rounds: u32,

    /// Override the RNG seed for dealing.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Append one JSON line per finished round to this file.
    #[arg(long, value_name = "PATH")]
    pub jsonl: Option<PathBuf>,

    /// Exit after validating the configuration (no rounds are played).
    #[arg(long)]
    pub validate_only: bool,

    /// Log engine and policy decisions at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid overrides: {0}")]
    Overrides(#[from] ValidationError),
    #[error("--rounds must be at least 1")]
    NoRounds,
}

impl Cli {
    /// Load the configured file (or defaults) and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<EngineConfig, CliError> {
        if self.rounds == 0 {
            return Err(CliError::NoRounds);
        }
        let mut config = match self.config.as_ref() {
            Some(path) => EngineConfig::from_path(path)?,
            None => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}
