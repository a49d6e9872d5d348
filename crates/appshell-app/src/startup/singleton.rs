//! Single-instance detection over the control-plane port.

use std::time::Duration;

use appshell_webview::bootstrap::api_base;

/// Bound on the check; a silent port is treated as free.
pub const INSTANCE_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// If another instance answers on `port`, ask it to show its home window
/// and return `true`. Any failure means no usable instance is running.
pub async fn notify_running_instance(port: u16) -> bool {
    let built = reqwest::Client::builder()
        .timeout(INSTANCE_CHECK_TIMEOUT)
        .no_proxy()
        .build();
    let client = match built {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "cannot build instance check client");
            return false;
        }
    };

    let url = format!("{}/home", api_base(port));
    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!(port, "another instance is running, showed its home window");
            true
        }
        Ok(resp) => {
            tracing::warn!(port, status = %resp.status(), "port answered but not as appshell");
            false
        }
        Err(e) => {
            tracing::debug!(port, error = %e, "no running instance");
            false
        }
    }
}
