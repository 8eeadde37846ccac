//! Server configuration loaded from a TOML file.
//!
//! ```toml
//! Host = "127.0.0.1"
//! Port = "7878"
//! # optional, bytes
//! MaxLineLength = 8192
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default upper bound on a single request line, excluding the terminator.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Listener settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(rename = "Host")]
    pub host: String,

    #[serde(rename = "Port")]
    pub port: String,

    #[serde(
        rename = "MaxLineLength",
        default = "ServerConfig::default_max_line_length"
    )]
    pub max_line_length: usize,
}

impl ServerConfig {
    const fn default_max_line_length() -> usize {
        DEFAULT_MAX_LINE_LENGTH
    }

    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            max_line_length: Self::default_max_line_length(),
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Read and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("Host must not be empty".to_string()));
        }

        if self.port.parse::<u16>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "Port must be an integer in 0..=65535, got: {:?}",
                self.port
            )));
        }

        if self.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "MaxLineLength must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
