//! Environment directives from the `environments` config section.
//!
//! Directives only ever change this process's environment, which child
//! processes and engine instances inherit. `user` and `machine` targets are
//! accepted for compatibility and applied at process scope as well.

use std::path::Path;

use appshell_config::schema::{EnvAction, EnvTarget, EnvironmentDirective};

/// Placeholder for the executable directory inside directive values.
pub const EXE_DIR_TOKEN: &str = "{.}";

/// Replace every `{.}` in `value` with `exe_dir`.
pub fn expand(value: &str, exe_dir: &Path) -> String {
    value.replace(EXE_DIR_TOKEN, &exe_dir.to_string_lossy())
}

/// Prepend `value` to a `;`-separated list unless an entry already matches
/// it case-insensitively. Returns `None` when nothing changes.
pub fn prepend_unique(current: &str, value: &str) -> Option<String> {
    let exists = current
        .split(';')
        .any(|entry| entry.trim().eq_ignore_ascii_case(value.trim()));
    if exists {
        None
    } else if current.is_empty() {
        Some(value.to_string())
    } else {
        Some(format!("{value};{current}"))
    }
}

/// Apply all directives in order. Returns how many changed the environment.
pub fn apply_directives(directives: &[EnvironmentDirective], exe_dir: &Path) -> usize {
    let mut applied = 0;
    for directive in directives {
        if directive.key.trim().is_empty() {
            tracing::warn!("environment directive without key skipped");
            continue;
        }
        if directive.target != EnvTarget::Process {
            tracing::debug!(
                key = %directive.key,
                target = ?directive.target,
                "applying directive at process scope"
            );
        }

        let value = expand(&directive.value, exe_dir);
        let changed = match directive.action {
            EnvAction::Set => {
                std::env::set_var(&directive.key, &value);
                true
            }
            EnvAction::Add => {
                let current = std::env::var(&directive.key).unwrap_or_default();
                match prepend_unique(&current, &value) {
                    Some(next) => {
                        std::env::set_var(&directive.key, next);
                        true
                    }
                    None => false,
                }
            }
            EnvAction::Unknown => {
                tracing::warn!(
                    key = %directive.key,
                    "environment directive with unknown action skipped"
                );
                false
            }
        };

        if changed {
            tracing::info!(key = %directive.key, action = ?directive.action, "environment updated");
            applied += 1;
        }
    }
    applied
}
