//! Paths relative to the running executable.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "app.json";

/// Directory holding the running executable, or `.` if it cannot be
/// determined.
pub fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `app.json` next to the executable.
pub fn default_config_path() -> PathBuf {
    executable_dir().join(CONFIG_FILE_NAME)
}

/// Join `path` onto `base` unless it is already absolute.
pub fn resolve_relative(base: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}
