//! # guestapp-config
//!
//! Typed, environment-driven configuration for the guest application.
//!
//! The configuration record is built once at process start from environment
//! variables (optionally seeded from a `.env` file), validated for shape, and
//! handed to consumers explicitly. Secrets are sourced only from the
//! environment and wrapped in `secrecy` types so they stay out of logs.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorKind, Error, Result};
