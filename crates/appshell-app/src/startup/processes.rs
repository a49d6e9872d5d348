//! Helper processes launched at startup and killed on exit.

use std::path::Path;
use std::time::Duration;

use appshell_config::loader::resolve_relative;
use appshell_config::schema::StartupProcess;
use tokio::process::{Child, Command};

use super::environment::expand;

/// How long to wait for a killed child to be reaped.
const KILL_WAIT: Duration = Duration::from_secs(3);

/// Win32 `CREATE_NO_WINDOW`.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

struct Tracked {
    path: String,
    child: Child,
}

/// Children spawned from the `startup` config section.
#[derive(Default)]
pub struct ChildProcesses {
    children: Vec<Tracked>,
}

impl ChildProcesses {
    /// Spawn every configured process. Relative paths and working
    /// directories resolve against `exe_dir`. A process that fails to start
    /// is logged and skipped. Must be called inside a tokio runtime.
    pub fn spawn_all(processes: &[StartupProcess], exe_dir: &Path) -> Self {
        let mut children = Vec::new();
        for spec in processes {
            match spawn_one(spec, exe_dir) {
                Ok(child) => {
                    tracing::info!(path = %spec.path, pid = ?child.id(), "startup process spawned");
                    children.push(Tracked {
                        path: spec.path.clone(),
                        child,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        path = %spec.path,
                        error = %e,
                        "startup process failed to spawn"
                    );
                }
            }
        }
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Kill every child still running and wait briefly for each to exit.
    /// Returns how many were killed.
    pub async fn kill_all(&mut self) -> usize {
        let mut killed = 0;
        for mut tracked in self.children.drain(..) {
            if let Ok(Some(status)) = tracked.child.try_wait() {
                tracing::debug!(path = %tracked.path, %status, "startup process already exited");
                continue;
            }
            if let Err(e) = tracked.child.start_kill() {
                tracing::warn!(path = %tracked.path, error = %e, "failed to kill startup process");
                continue;
            }
            match tokio::time::timeout(KILL_WAIT, tracked.child.wait()).await {
                Ok(Ok(_)) => killed += 1,
                Ok(Err(e)) => {
                    tracing::warn!(path = %tracked.path, error = %e, "wait after kill failed");
                }
                Err(_) => {
                    tracing::warn!(path = %tracked.path, "startup process did not exit in time");
                }
            }
        }
        tracing::info!(killed, "startup processes stopped");
        killed
    }
}

fn spawn_one(spec: &StartupProcess, exe_dir: &Path) -> std::io::Result<Child> {
    if spec.path.trim().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty process path",
        ));
    }

    let program = resolve_relative(exe_dir, &expand(&spec.path, exe_dir));
    let mut command = Command::new(program);
    command
        .args(spec.args.iter().map(|arg| expand(arg, exe_dir)))
        .kill_on_drop(true);

    if !spec.working_directory.trim().is_empty() {
        command.current_dir(resolve_relative(
            exe_dir,
            &expand(&spec.working_directory, exe_dir),
        ));
    }

    hide_console(&mut command, spec.create_no_window);
    command.spawn()
}

#[cfg(windows)]
fn hide_console(command: &mut Command, hide: bool) {
    if hide {
        command.creation_flags(CREATE_NO_WINDOW);
    }
}

#[cfg(not(windows))]
fn hide_console(_command: &mut Command, _hide: bool) {}
