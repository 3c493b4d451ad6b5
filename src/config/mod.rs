//! Configuration loading and validation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Round structure of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Rounds played with drafted decks; excluded from constructed statistics
    #[serde(default = "default_draft_rounds")]
    pub draft_rounds: BTreeSet<u32>,

    /// First round of day 2
    #[serde(default = "default_day2_start_round")]
    pub day2_start_round: u32,
}

fn default_draft_rounds() -> BTreeSet<u32> {
    [1, 2, 3, 8, 9, 10].into_iter().collect()
}

fn default_day2_start_round() -> u32 {
    11
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            draft_rounds: default_draft_rounds(),
            day2_start_round: default_day2_start_round(),
        }
    }
}

/// File names of the three exports inside `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_results_file")]
    pub results: String,

    #[serde(default = "default_decklists_file")]
    pub decklists: String,

    #[serde(default = "default_analysis_file")]
    pub analysis: String,
}

fn default_results_file() -> String {
    "results.json".to_string()
}

fn default_decklists_file() -> String {
    "decklists.json".to_string()
}

fn default_analysis_file() -> String {
    "analysis.json".to_string()
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            results: default_results_file(),
            decklists: default_decklists_file(),
            analysis: default_analysis_file(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub tournament: TournamentConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            files: FilesConfig::default(),
            tournament: TournamentConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tournament.day2_start_round == 0 {
            return Err(ConfigError::ValidationError(
                "Day 2 start round must be greater than 0".to_string(),
            ));
        }

        if self.tournament.draft_rounds.contains(&0) {
            return Err(ConfigError::ValidationError(
                "Draft rounds are numbered from 1".to_string(),
            ));
        }

        for file in [
            &self.files.results,
            &self.files.decklists,
            &self.files.analysis,
        ] {
            if file.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Export file names must not be empty".to_string(),
                ));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
