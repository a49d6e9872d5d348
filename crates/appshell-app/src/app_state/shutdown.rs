//! Waiting for the end of the process: an exit request on the bus or Ctrl+C.

use appshell_common::ShellEvent;
use tokio::sync::broadcast::{self, error::RecvError};

use super::core::AppContext;

/// Why the service loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `Shutdown` was published, usually by the `exit` route.
    Requested,
    /// The process received Ctrl+C.
    Interrupted,
}

/// Resolve once `Shutdown` is published or the bus closes. Subscribe before
/// starting anything that might publish it.
pub async fn wait_for_shutdown(mut rx: broadcast::Receiver<ShellEvent>) {
    loop {
        match rx.recv().await {
            Ok(ShellEvent::Shutdown) | Err(RecvError::Closed) => return,
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "shutdown listener lagged");
            }
        }
    }
}

/// Wait for an exit request or Ctrl+C. Ctrl+C is turned into a regular exit
/// request so the UI thread and server stop the same way in both cases.
pub async fn wait_for_exit(ctx: &AppContext, rx: broadcast::Receiver<ShellEvent>) -> ExitReason {
    tokio::select! {
        _ = wait_for_shutdown(rx) => ExitReason::Requested,
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "ctrl-c handler failed");
            }
            tracing::info!("interrupted");
            ctx.request_exit();
            ExitReason::Interrupted
        }
    }
}
