use bigtwo_core::model::player::{Controller, Seat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_PLAYER_NAMES: [&str; 4] = ["You", "East", "South", "West"];
const MAX_NAME_LEN: usize = 32;

/// Root engine configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_players")]
    pub players: Vec<String>,
    #[serde(default = "default_human_seats")]
    pub human_seats: Vec<usize>,
    #[serde(default)]
    pub opening: OpeningConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            players: default_players(),
            human_seats: default_human_seats(),
            opening: OpeningConfig::default(),
            pacing: PacingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: EngineConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_players(&self.players)?;
        validate_human_seats(&self.human_seats)?;
        self.opening.validate()?;
        self.logging.normalize();
        Ok(())
    }

    pub fn names(&self) -> [String; 4] {
        Seat::LOOP.map(|seat| {
            self.players
                .get(seat.index())
                .cloned()
                .unwrap_or_else(|| DEFAULT_PLAYER_NAMES[seat.index()].to_string())
        })
    }

    pub fn controllers(&self) -> [Controller; 4] {
        Seat::LOOP.map(|seat| {
            if self.human_seats.contains(&seat.index()) {
                Controller::Human
            } else {
                Controller::Computer
            }
        })
    }
}

fn default_players() -> Vec<String> {
    DEFAULT_PLAYER_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_human_seats() -> Vec<usize> {
    vec![0]
}

/// Who leads the first turn of a round.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OpeningRule {
    #[default]
    FixedSeat,
    ThreeOfDiamonds,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct OpeningConfig {
    #[serde(default)]
    pub rule: OpeningRule,
    #[serde(default)]
    pub seat: usize,
}

impl OpeningConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rule == OpeningRule::FixedSeat && Seat::from_index(self.seat).is_none() {
            return Err(ValidationError::InvalidField {
                field: "opening.seat".to_string(),
                message: format!("seat index {} is out of range 0..=3", self.seat),
            });
        }
        Ok(())
    }

    pub fn fixed_seat(&self) -> Seat {
        Seat::from_index(self.seat).unwrap_or(Seat::North)
    }
}

/// Observer pacing. The engine itself never sleeps; consumers apply the
/// delay after each computer play they render.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PacingConfig {
    #[serde(default)]
    pub bot_delay_ms: u64,
}

/// Logging configuration defaults to human-readable stderr output.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub json_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            json_path: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    pub fn json_path(&self) -> PathBuf {
        self.json_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("bigtwo-telemetry.jsonl"))
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

fn validate_players(players: &[String]) -> Result<(), ValidationError> {
    if players.len() != 4 {
        return Err(ValidationError::InvalidField {
            field: "players".to_string(),
            message: format!("exactly four player names are required, got {}", players.len()),
        });
    }

    let mut seen = HashSet::new();
    for (index, name) in players.iter().enumerate() {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("players[{index}]"),
                message: "player name must not be empty".to_string(),
            });
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::InvalidField {
                field: format!("players[{index}]"),
                message: format!("player name longer than {MAX_NAME_LEN} characters"),
            });
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(ValidationError::InvalidField {
                field: "players".to_string(),
                message: format!("player name '{trimmed}' defined more than once"),
            });
        }
    }

    Ok(())
}

fn validate_human_seats(seats: &[usize]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for &seat in seats {
        if Seat::from_index(seat).is_none() {
            return Err(ValidationError::InvalidField {
                field: "human_seats".to_string(),
                message: format!("seat index {seat} is out of range 0..=3"),
            });
        }
        if !seen.insert(seat) {
            return Err(ValidationError::InvalidField {
                field: "human_seats".to_string(),
                message: format!("seat index {seat} listed more than once"),
            });
        }
    }
    Ok(())
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid config {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
