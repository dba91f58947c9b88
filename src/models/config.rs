use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::JobState;

/// Configuration loaded from tq-rerun.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub broker: BrokerConfig,
    #[serde(default)]
    pub submitter: SubmitterConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Message broker routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Host used when a job's command line names no broker
    #[serde(default = "default_host")]
    pub default_host: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            default_host: default_host(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

/// External submission program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitterConfig {
    /// Program that publishes a job request to the broker
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// Submission-type tag passed as --service
    #[serde(default = "default_service")]
    pub service: String,
    /// Timeout in seconds for one submission (0 disables it)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Directory for transient request files (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            service: default_service(),
            timeout_seconds: default_timeout(),
            temp_dir: None,
        }
    }
}

fn default_program() -> PathBuf {
    PathBuf::from("add-mb-job")
}

fn default_service() -> String {
    "rerun".to_string()
}

fn default_timeout() -> u64 {
    120
}

/// Job export reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// States that count as failed
    #[serde(default = "default_failed_states")]
    pub failed_states: Vec<JobState>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            failed_states: default_failed_states(),
        }
    }
}

fn default_failed_states() -> Vec<JobState> {
    vec![JobState::Error]
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.clone(), e))
    }

    /// Load config from the given path, falling back to defaults if it does not exist
    pub fn load_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(
        mut self,
        program: Option<PathBuf>,
        timeout: Option<u64>,
        default_host: Option<String>,
    ) -> Self {
        if let Some(p) = program {
            self.submitter.program = p;
        }
        if let Some(t) = timeout {
            self.submitter.timeout_seconds = t;
        }
        if let Some(h) = default_host {
            self.broker.default_host = h;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
}
