//! Integration tests for telemetry initialization.

use std::collections::HashMap;

use guestapp_config::telemetry::{LogFormat, TelemetryConfig, init_telemetry};
use guestapp_config::{ConfigErrorKind, Error};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn telemetry_config_defaults() {
    let config = TelemetryConfig::load(&HashMap::new()).unwrap();
    assert_eq!(config, TelemetryConfig::default());
    assert_eq!(config.log_level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
}

#[test]
fn telemetry_config_reads_level_and_format() {
    let config = TelemetryConfig::load(&env(&[
        ("LOG_LEVEL", "guestapp_config=debug,warn"),
        ("LOG_FORMAT", "JSON"),
    ]))
    .unwrap();
    assert_eq!(config.log_level, "guestapp_config=debug,warn");
    assert_eq!(config.format, LogFormat::Json);
}

#[test]
fn rust_log_from_mapping_wins_over_log_level() {
    let config = TelemetryConfig::load(&env(&[
        ("RUST_LOG", "guestapp_config=trace"),
        ("LOG_LEVEL", "warn"),
    ]))
    .unwrap();
    assert_eq!(config.log_level, "guestapp_config=trace");

    let config = TelemetryConfig::load(&env(&[("RUST_LOG", " "), ("LOG_LEVEL", "warn")])).unwrap();
    assert_eq!(config.log_level, "warn");
}

#[test]
fn malformed_rust_log_names_its_variable() {
    match TelemetryConfig::load(&env(&[("RUST_LOG", "guestapp_config=notalevel")])) {
        Err(Error::Config(e)) => {
            assert_eq!(e.kind(), ConfigErrorKind::InvalidValue);
            assert_eq!(e.key(), "log_level");
            assert_eq!(e.var(), "RUST_LOG");
        }
        other => panic!("expected invalid log_level, got {other:?}"),
    }
}

#[test]
fn telemetry_config_rejects_unknown_format() {
    match TelemetryConfig::load(&env(&[("LOG_FORMAT", "xml")])) {
        Err(Error::Config(e)) => {
            assert_eq!(e.kind(), ConfigErrorKind::InvalidValue);
            assert_eq!(e.key(), "log_format");
        }
        other => panic!("expected invalid log_format, got {other:?}"),
    }
}

#[test]
fn telemetry_initializes_once() {
    // The global subscriber can only be set once per process; this is the
    // only test in this binary that installs one.
    let first = init_telemetry(TelemetryConfig::default());
    assert!(first.is_ok());

    let second = init_telemetry(TelemetryConfig::default());
    assert!(matches!(second, Err(Error::Telemetry(_))));
}
