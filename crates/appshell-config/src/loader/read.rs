//! Reading and parsing the config document.

use std::path::Path;

use appshell_common::ConfigError;
use tracing::{info, warn};

use crate::schema::AppConfig;
use crate::validation;

use super::paths::default_config_path;

/// Load config from a specific JSON file.
///
/// Missing fields take their serde defaults. Validation problems are logged
/// and the parsed config is returned as-is; callers that need a hard check
/// run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse {}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config validation warning: {e}");
    }

    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load `app.json` from next to the executable.
///
/// A missing file is not an error: defaults are returned. Nothing is written
/// back to disk.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = default_config_path();
    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "no config found, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(e),
    }
}
