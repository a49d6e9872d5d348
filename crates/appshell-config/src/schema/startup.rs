//! Child processes and environment directives applied before any window opens.

use serde::{Deserialize, Serialize};

/// A process launched at startup and killed when the shell exits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StartupProcess {
    pub path: String,
    pub args: Vec<String>,
    pub working_directory: String,
    pub create_no_window: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvAction {
    /// Prepend the value to a `;`-separated list, skipping duplicates.
    Add,
    /// Overwrite the variable.
    Set,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvTarget {
    User,
    Machine,
    #[default]
    #[serde(other)]
    Process,
}

/// One entry of the `environments` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentDirective {
    pub action: EnvAction,
    #[serde(rename = "type")]
    pub target: EnvTarget,
    pub key: String,
    pub value: String,
}
