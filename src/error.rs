//! Error types for guestapp-config.

use thiserror::Error;

/// Which class of configuration problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    MissingSecret,
    InvalidValue,
}

/// A problem with a single configuration field.
///
/// `key` is the snake_case name of the field (`database_url`,
/// `enable_waitlist`, `log_level`), `var` the environment variable it was
/// read from. Values are never carried here,
/// since most of them are secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("required secret {key} is not set (expected environment variable {var})")]
    MissingSecret {
        key: &'static str,
        var: &'static str,
    },

    #[error("invalid value for {key} (from {var}): {reason}")]
    InvalidValue {
        key: &'static str,
        var: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::MissingSecret { .. } => ConfigErrorKind::MissingSecret,
            ConfigError::InvalidValue { .. } => ConfigErrorKind::InvalidValue,
        }
    }

    /// Name of the offending field.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigError::MissingSecret { key, .. } | ConfigError::InvalidValue { key, .. } => key,
        }
    }

    /// Environment variable the field was (or should have been) read from.
    pub fn var(&self) -> &'static str {
        match self {
            ConfigError::MissingSecret { var, .. } | ConfigError::InvalidValue { var, .. } => var,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read env file: {0}")]
    EnvFile(String),

    #[error("failed to init telemetry: {0}")]
    Telemetry(String),
}

pub type Result<T> = std::result::Result<T, Error>;
