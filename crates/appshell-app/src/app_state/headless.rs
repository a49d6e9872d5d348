//! UI thread without native windows.

use std::thread::JoinHandle;

use appshell_webview::HeadlessSurfaceFactory;

use super::dispatch::UiQueue;
use super::host::WindowHost;

/// Run the UI queue on a dedicated thread with headless surfaces. The host
/// is built on that thread because surfaces never leave it. The thread exits
/// only after `WindowHost::request_exit`.
pub fn spawn_ui_thread<F>(queue: UiQueue, make_host: F) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce() -> WindowHost + Send + 'static,
{
    std::thread::Builder::new()
        .name("appshell-ui".into())
        .spawn(move || {
            let host = make_host();
            queue.run_blocking(host, Box::new(HeadlessSurfaceFactory::default()));
        })
}
