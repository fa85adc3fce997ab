//! Logging initialization.
//!
//! Sets up tracing-subscriber with an env filter and a fmt layer, either
//! human-readable or JSON. Log settings come from the same variable mapping
//! as [`Config`](crate::config::Config) so the subscriber can be installed
//! before the config is loaded and its warnings are not lost.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

const RUST_LOG_VAR: &str = "RUST_LOG";
const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format {s:?} (expected pretty or json)")),
        }
    }
}

/// Configuration for telemetry initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directive (e.g. "info", "guestapp_config=debug").
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl TelemetryConfig {
    /// Read `RUST_LOG`, `LOG_LEVEL` and `LOG_FORMAT` from a variable
    /// mapping. `RUST_LOG` wins over `LOG_LEVEL`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidValue` config error if a variable is set but
    /// malformed.
    pub fn load(env: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        let level = [RUST_LOG_VAR, LOG_LEVEL_VAR]
            .into_iter()
            .find_map(|var| non_blank(env, var).map(|level| (var, level)));
        if let Some((var, level)) = level {
            tracing_subscriber::EnvFilter::try_new(level).map_err(|e| {
                ConfigError::InvalidValue {
                    key: "log_level",
                    var,
                    reason: e.to_string(),
                }
            })?;
            config.log_level = level.to_string();
        }

        if let Some(format) = non_blank(env, LOG_FORMAT_VAR) {
            config.format = format.parse().map_err(|reason| ConfigError::InvalidValue {
                key: "log_format",
                var: LOG_FORMAT_VAR,
                reason,
            })?;
        }

        Ok(config)
    }
}

fn non_blank<'a>(env: &'a HashMap<String, String>, var: &str) -> Option<&'a str> {
    env.get(var).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Initialize the global tracing subscriber.
///
/// The filter comes from `config.log_level` only; the process `RUST_LOG` is
/// picked up through [`TelemetryConfig::load`] like every other variable.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be initialized (e.g. if
/// one was already set).
pub fn init_telemetry(config: TelemetryConfig) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let initialized = match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
    };

    initialized.map_err(|e| Error::Telemetry(e.to_string()))
}
