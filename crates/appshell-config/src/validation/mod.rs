//! Config validation.
//!
//! Collects every problem before failing so a single run reports all of
//! them.

use appshell_common::ConfigError;

use crate::schema::{AppConfig, EnvAction};

#[cfg(test)]
mod tests;

/// Validate a config, returning every problem joined with `; `.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push("server.port must be between 1 and 65535".to_string());
    }
    if config.pool.acquire_timeout_ms == 0 {
        errors.push("pool.acquire-timeout-ms must be greater than 0".to_string());
    }
    if config.broadcast.queue_capacity == 0 {
        errors.push("broadcast.queue-capacity must be greater than 0".to_string());
    }
    if config.broadcast.send_timeout_ms == 0 {
        errors.push("broadcast.send-timeout-ms must be greater than 0".to_string());
    }

    for (i, proc) in config.startup.iter().enumerate() {
        if proc.path.trim().is_empty() {
            errors.push(format!("startup[{i}].path must not be empty"));
        }
    }

    for (i, directive) in config.environments.iter().enumerate() {
        if directive.key.trim().is_empty() {
            errors.push(format!("environments[{i}].key must not be empty"));
        }
        if directive.action == EnvAction::Unknown {
            tracing::warn!(
                index = i,
                "environments entry has an unknown action, it will be skipped"
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
