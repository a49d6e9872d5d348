//! appshell configuration.
//!
//! Reads `app.json` (next to the executable by default). Every section uses
//! serde defaults so a missing file or a partial document both work. Keys are
//! kebab-case to stay compatible with existing `app.json` files.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use appshell_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config_path, executable_dir, load_default, load_from_path};
pub use schema::AppConfig;

use std::path::Path;

use appshell_common::ConfigError;

/// Load config from the default location and validate it.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config = loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &AppConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
