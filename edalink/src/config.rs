//! Connector configuration.
//!
//! Loaded from a JSON file, from `EDALINK_*` environment variables, or built
//! in code. Every field has a default so partial files are accepted.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ENV_MODE: &str = "EDALINK_MODE";
pub const ENV_API_TOKEN: &str = "EDALINK_API_TOKEN";
pub const ENV_BASE_URL: &str = "EDALINK_BASE_URL";
pub const ENV_SEED: &str = "EDALINK_SEED";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Which backend the factory builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorMode {
    #[default]
    Mock,
    Live,
}

impl fmt::Display for ConnectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorMode::Mock => f.write_str("mock"),
            ConnectorMode::Live => f.write_str("live"),
        }
    }
}

impl FromStr for ConnectorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ConnectorMode::Mock),
            "live" => Ok(ConnectorMode::Live),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_MODE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorConfig {
    pub mode: ConnectorMode,
    /// Required by the live backend; ignored by the mock.
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    /// Seed for the mock connector's random source. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Populate the mock store with the demo project on construction.
    pub seed_demo_data: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            mode: ConnectorMode::Mock,
            api_token: None,
            base_url: None,
            seed: None,
            seed_demo_data: true,
        }
    }
}

impl ConnectorConfig {
    pub fn mock() -> Self {
        Self::default()
    }

    pub fn live(api_token: Option<String>) -> Self {
        Self {
            mode: ConnectorMode::Live,
            api_token,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Overlay `EDALINK_*` environment variables onto `self`.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    fn merge_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_MODE) {
            self.mode = mode.parse()?;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(seed) = lookup(ENV_SEED) {
            let parsed = seed.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_SEED.to_string(),
                value: seed.clone(),
            })?;
            self.seed = Some(parsed);
        }
        Ok(self)
    }
}
