#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Modane Configuration
//!
//! This crate provides configuration management for the headless pipeline.
//! It handles:
//! - the optional TOML configuration file (logging level)
//! - the `EMF2XMI` environment variable locating the archive conversion tool
//!
//! A missing configuration file is not an error: defaults apply. A missing
//! conversion tool variable is, but only for runs that start from archives.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the full path to the archive conversion tool.
pub const TOOL_ENV_VAR: &str = "EMF2XMI";

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "MODANE_CONFIG";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// The conversion tool variable is unset or empty
    #[error("{0} environment variable must be set with the full path to the Magicdraw emf2xmi tool.")]
    MissingToolVariable(&'static str),
    /// The conversion tool variable does not hold an absolute path
    #[error("{variable} must be an absolute path, got '{}'", .value.display())]
    RelativeToolPath {
        /// Variable name
        variable: &'static str,
        /// Offending value
        value: PathBuf,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "warn".to_string() } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Returns the default config file path:
    /// `{config_dir()}/modane/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("modane");
        Ok(config_dir.join("config.toml"))
    }

    /// Load the effective configuration.
    ///
    /// `MODANE_CONFIG` names a file that must exist. Otherwise the default path is
    /// read when present, and defaults apply when it is not.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_internal(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from), Self::default_path().ok())
    }

    /// Internal function for testing - allows injection of the two candidate paths
    fn load_internal(
        explicit: Option<PathBuf>,
        default_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }
}

/// Location of the external archive conversion tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Absolute path of the conversion executable
    pub tool_path: PathBuf,
}

impl ToolConfig {
    /// Read the tool location from `EMF2XMI`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(TOOL_ENV_VAR, |name| std::env::var_os(name).map(PathBuf::from))
    }

    /// Internal function for testing - allows injection of environment values
    fn from_lookup(
        variable: &'static str,
        lookup: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let value = lookup(variable)
            .filter(|value| !value.as_os_str().is_empty())
            .ok_or(ConfigError::MissingToolVariable(variable))?;
        if !value.is_absolute() {
            return Err(ConfigError::RelativeToolPath { variable, value });
        }
        Ok(Self { tool_path: value })
    }
}
