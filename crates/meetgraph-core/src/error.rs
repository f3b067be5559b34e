//! Error types for configuration and record normalization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or validating startup arguments.
///
/// All of these are fatal and happen before any side effect.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid event id '{0}': expected a positive integer")]
    InvalidEventId(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required setting: {0}")]
    Missing(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A raw record that cannot be turned into a canonical entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{record}: invalid {field} '{value}'")]
    InvalidId {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{record}: missing required field '{field}'")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
}

/// Result type for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;
