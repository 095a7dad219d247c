use crate::robot_transport::TransportEndpoint;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;

pub const STORE_PATH_VAR: &str = "STORE_PATH";
pub const TARGET_HOST_VAR: &str = "TARGET_HOST";
pub const TARGET_PORT_VAR: &str = "TARGET_PORT";
pub const TIMEOUT_MS_VAR: &str = "TIMEOUT_MS";

const DEFAULT_TIMEOUT_MS: u64 = 500;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error while accessing configuration")]
    IoError(#[from] std::io::Error),
    #[error("error while parsing json")]
    JsonError(#[from] serde_json::error::Error),
    #[error("error while parsing yaml")]
    YamlError(#[from] serde_yaml::Error),
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVariable { name: &'static str, value: String },
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Process-wide relay settings, read once at startup.
///
/// Host and port are deliberately allowed to stay unset here; the
/// transport validates the endpoint on first delivery, not at load time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Directory of command definition files
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Robot controller address
    #[serde(default)]
    pub host: String,
    /// Robot controller port
    #[serde(default)]
    pub port: u16,
    /// Connect/send bound in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for RelayConfig {
    fn default() -> RelayConfig {
        RelayConfig {
            store_path: default_store_path(),
            host: String::new(),
            port: 0,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RelayConfig {
    pub fn parse_json(text: &str) -> Result<RelayConfig> {
        let config = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn parse_yaml(text: &str) -> Result<RelayConfig> {
        let config = serde_yaml::from_str(text)?;
        Ok(config)
    }

    pub fn load_json(path: &str) -> Result<RelayConfig> {
        let text = fs::read_to_string(path)?;
        RelayConfig::parse_json(&text)
    }

    pub fn load_yaml(path: &str) -> Result<RelayConfig> {
        let text = fs::read_to_string(path)?;
        RelayConfig::parse_yaml(&text)
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn save_yaml(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Build a config from the recognized environment variables.
    ///
    /// Missing variables keep their defaults; a present but unparseable
    /// numeric variable is an error.
    pub fn from_env() -> Result<RelayConfig> {
        let mut config = RelayConfig::default();
        if let Ok(value) = env::var(STORE_PATH_VAR) {
            config.store_path = PathBuf::from(value);
        }
        if let Ok(value) = env::var(TARGET_HOST_VAR) {
            config.host = value;
        }
        if let Ok(value) = env::var(TARGET_PORT_VAR) {
            config.port = value
                .parse()
                .map_err(|_| ConfigError::InvalidVariable {
                    name: TARGET_PORT_VAR,
                    value,
                })?;
        }
        if let Ok(value) = env::var(TIMEOUT_MS_VAR) {
            config.timeout_ms = value
                .parse()
                .map_err(|_| ConfigError::InvalidVariable {
                    name: TIMEOUT_MS_VAR,
                    value,
                })?;
        }
        Ok(config)
    }

    pub fn endpoint(&self) -> TransportEndpoint {
        TransportEndpoint::new(self.host.clone(), self.port, self.timeout_ms)
    }
}
