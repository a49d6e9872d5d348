//! The async half of the process: control plane, resident windows and
//! startup children, torn down together on exit.

use std::path::PathBuf;
use std::sync::Arc;

use appshell_common::ShellError;
use tracing::{error, info};

use crate::control;
use crate::startup::ChildProcesses;

use super::core::AppContext;
use super::shutdown;

/// Serve the control plane, open the resident windows and block until exit.
///
/// Teardown order: the server stops accepting once `Shutdown` is published,
/// children are killed, then the server task is awaited. Any startup failure
/// still requests exit so the UI thread does not outlive this task.
pub async fn run_services(
    ctx: Arc<AppContext>,
    static_dir: PathBuf,
    mut children: ChildProcesses,
) -> Result<(), ShellError> {
    let listener = match control::bind(ctx.port).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, "control plane could not start");
            ctx.request_exit();
            children.kill_all().await;
            return Err(e);
        }
    };

    let exit_rx = ctx.bus.subscribe();
    let router = control::router(Arc::clone(&ctx), &static_dir);
    let server = tokio::spawn(control::serve(
        listener,
        router,
        shutdown::wait_for_shutdown(ctx.bus.subscribe()),
    ));

    let mut outcome = Ok(());
    if let Err(e) = ctx.start().await {
        error!(error = %e, "startup failed");
        ctx.request_exit();
        outcome = Err(e);
    }

    let reason = shutdown::wait_for_exit(&ctx, exit_rx).await;
    info!(?reason, "shutting down");

    children.kill_all().await;

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(error = %e, "control plane failed");
            outcome = outcome.and(Err(e));
        }
        Err(e) => {
            error!(error = %e, "control plane task panicked");
            outcome = outcome.and(Err(ShellError::Server(e.to_string())));
        }
    }
    outcome
}
