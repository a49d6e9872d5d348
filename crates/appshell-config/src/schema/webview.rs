//! Web engine environment: profile directory and runtime location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WebViewConfig {
    /// Profile directory shared by every engine instance.
    pub user_data_directory: String,
    /// Fixed-version runtime folder. Empty means "use `bin/` next to the
    /// executable if it exists, otherwise the system runtime".
    pub browser_executable_folder: String,
    /// Extra command-line switches passed to the engine.
    pub additional_browser_arguments: String,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            user_data_directory: default_user_data_directory()
                .to_string_lossy()
                .into_owned(),
            browser_executable_folder: String::new(),
            additional_browser_arguments: String::new(),
        }
    }
}

impl WebViewConfig {
    /// The runtime folder to hand to the engine, if any.
    pub fn resolve_browser_folder(&self) -> Option<PathBuf> {
        if !self.browser_executable_folder.is_empty() {
            return Some(PathBuf::from(&self.browser_executable_folder));
        }
        let bundled = crate::loader::executable_dir().join("bin");
        bundled.is_dir().then_some(bundled)
    }
}

/// `<data dir>/WebApplications/DefaultUserData`, falling back to a
/// relative path when the platform has no data directory.
pub fn default_user_data_directory() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("WebApplications"))
        .unwrap_or_else(|| PathBuf::from("WebApplications"))
        .join("DefaultUserData")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_data_directory_ends_with_profile_name() {
        let dir = default_user_data_directory();
        assert!(dir.ends_with("WebApplications/DefaultUserData"));
    }

    #[test]
    fn explicit_browser_folder_wins() {
        let config = WebViewConfig {
            browser_executable_folder: "/opt/runtime".into(),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_browser_folder(),
            Some(PathBuf::from("/opt/runtime"))
        );
    }
}
