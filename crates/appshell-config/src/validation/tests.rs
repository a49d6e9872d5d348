use super::*;
use crate::schema::{EnvironmentDirective, StartupProcess};

#[test]
fn default_config_is_valid() {
    assert!(validate(&AppConfig::default()).is_ok());
}

#[test]
fn port_zero_is_rejected() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn zero_acquire_timeout_is_rejected() {
    let mut config = AppConfig::default();
    config.pool.acquire_timeout_ms = 0;
    let err = validate(&config).unwrap_err();
    assert!(err.to_string().contains("acquire-timeout-ms"));
}

#[test]
fn all_errors_are_reported_together() {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.broadcast.queue_capacity = 0;
    config.startup.push(StartupProcess::default());
    config.environments.push(EnvironmentDirective::default());

    let msg = match validate(&config) {
        Err(ConfigError::ValidationError(msg)) => msg,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert!(msg.contains("server.port"));
    assert!(msg.contains("broadcast.queue-capacity"));
    assert!(msg.contains("startup[0].path"));
    assert!(msg.contains("environments[0].key"));
    assert_eq!(msg.matches("; ").count(), 3);
}
