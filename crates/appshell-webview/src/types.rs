use std::path::PathBuf;

/// Shared engine environment, established once per process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineEnvironment {
    /// Profile directory used by every engine instance.
    pub user_data_dir: PathBuf,
    /// Fixed-version runtime folder; `None` uses the installed runtime.
    pub browser_folder: Option<PathBuf>,
    /// Extra engine command-line switches.
    pub additional_arguments: Option<String>,
}

impl EngineEnvironment {
    pub fn new(user_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            user_data_dir: user_data_dir.into(),
            ..Default::default()
        }
    }
}
