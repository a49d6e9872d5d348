mod app_state;
mod cli;
mod control;
mod startup;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use appshell_common::ShellError;
use appshell_config::loader::resolve_relative;
use appshell_config::schema::LogLevel;
use appshell_config::AppConfig;
use tracing_subscriber::EnvFilter;

use app_state::services::run_services;
use app_state::AppContext;
use startup::ChildProcesses;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const OWN_CRATES: [&str; 4] = [
    "appshell_app",
    "appshell_common",
    "appshell_config",
    "appshell_webview",
];

/// `warn` for dependencies, `level` for this workspace.
fn default_filter(level: &str) -> String {
    let mut filter = String::from("warn");
    for krate in OWN_CRATES {
        filter.push_str(&format!(",{krate}={level}"));
    }
    filter
}

/// `--log-level` wins over `RUST_LOG`, which wins over the config file.
fn init_logging(cli_level: Option<&str>, config_level: LogLevel) {
    let from_cli = cli_level.and_then(|raw| {
        let directive = if LEVELS.contains(&raw) {
            default_filter(raw)
        } else {
            raw.to_string()
        };
        EnvFilter::try_new(directive).ok()
    });
    let filter = from_cli
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter(config_level.as_str())));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&str>) -> (AppConfig, Option<appshell_common::ConfigError>) {
    let loaded = match path {
        Some(path) => appshell_config::load_config_from(Path::new(path)),
        None => appshell_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    }
}

fn main() -> appshell_common::Result<()> {
    let args = cli::parse();

    // Config first: it carries the default log level.
    let (mut config, load_error) = load_config(args.config.as_deref());
    init_logging(args.log_level.as_deref(), config.logging.level);

    tracing::info!("appshell v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        tracing::warn!("config load failed, using defaults: {e}");
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let port = config.server.port;

    let exe_dir = appshell_config::executable_dir();
    let static_dir = resolve_relative(&exe_dir, &config.server.static_dir);

    // Before any worker thread exists.
    let applied = startup::apply_directives(&config.environments, &exe_dir);
    tracing::debug!(applied, "environment directives applied");

    let runtime = tokio::runtime::Runtime::new()?;

    if !args.no_singleton_check && runtime.block_on(startup::notify_running_instance(port)) {
        tracing::info!(port, "another instance is running, asked it to show home");
        return Ok(());
    }

    let children = {
        let _guard = runtime.enter();
        ChildProcesses::spawn_all(&config.startup, &exe_dir)
    };

    let result = if args.headless || !cfg!(feature = "native") {
        run_headless(&runtime, config, port, static_dir, children)
    } else {
        run_native(&runtime, config, port, static_dir, children)
    };

    runtime.shutdown_timeout(std::time::Duration::from_secs(2));
    match &result {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(e) => tracing::error!("exiting with error: {e}"),
    }
    result
}

fn run_headless(
    runtime: &tokio::runtime::Runtime,
    config: AppConfig,
    port: u16,
    static_dir: PathBuf,
    children: ChildProcesses,
) -> Result<(), ShellError> {
    let (ui, queue) = app_state::ui_channel(Arc::new(|| {}));
    let clipboard = Arc::new(control::clipboard::MemoryClipboard::default());
    let ctx = Arc::new(AppContext::new(config, port, ui, clipboard));

    let ui_thread = app_state::headless::spawn_ui_thread(queue, {
        let ctx = Arc::clone(&ctx);
        move || ctx.window_host()
    })?;
    tracing::info!("running headless");
    let result = runtime.block_on(run_services(Arc::clone(&ctx), static_dir, children));

    drop(ctx);
    if ui_thread.join().is_err() {
        tracing::error!("ui thread panicked");
    }
    result
}

#[cfg(feature = "native")]
fn run_native(
    runtime: &tokio::runtime::Runtime,
    config: AppConfig,
    port: u16,
    static_dir: PathBuf,
    children: ChildProcesses,
) -> Result<(), ShellError> {
    use app_state::native;
    use appshell_common::ShellEvent;

    let event_loop = native::event_loop()?;
    let (ui, queue) = app_state::ui_channel(native::waker(&event_loop));
    let clipboard = Arc::new(control::clipboard::SystemClipboard);
    let ctx = Arc::new(AppContext::new(config, port, ui, clipboard));
    let host = ctx.window_host();
    let bus = ctx.bus.clone();

    let services = runtime.spawn(async move {
        let result = run_services(ctx, static_dir, children).await;
        if let Err(e) = &result {
            tracing::error!("services stopped: {e}");
        }
        result
    });

    let ui_result = native::run(event_loop, queue, host);
    // The loop may also end without an exit request.
    bus.publish(ShellEvent::Shutdown);

    let services_result = match runtime.block_on(services) {
        Ok(result) => result,
        Err(e) => Err(ShellError::Other(format!("services task failed: {e}"))),
    };
    ui_result.and(services_result)
}

#[cfg(not(feature = "native"))]
fn run_native(
    runtime: &tokio::runtime::Runtime,
    config: AppConfig,
    port: u16,
    static_dir: PathBuf,
    children: ChildProcesses,
) -> Result<(), ShellError> {
    run_headless(runtime, config, port, static_dir, children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_scopes_level_to_workspace_crates() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("appshell_app=debug"));
        assert!(filter.contains("appshell_webview=debug"));
        assert!(EnvFilter::try_new(filter).is_ok());
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(
            &path,
            r#"{"server":{"port":0},"pool":{"acquire-timeout-ms":0}}"#,
        )
        .unwrap();

        let (config, error) = load_config(path.to_str());
        assert!(matches!(
            error,
            Some(appshell_common::ConfigError::ValidationError(_))
        ));
        assert_eq!(config.server.port, AppConfig::default().server.port);
        assert_eq!(
            config.pool.acquire_timeout_ms,
            AppConfig::default().pool.acquire_timeout_ms
        );
    }

    #[test]
    fn missing_config_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let (config, error) = load_config(missing.to_str());
        assert!(error.is_some());
        assert_eq!(config.server.port, AppConfig::default().server.port);
    }
}
