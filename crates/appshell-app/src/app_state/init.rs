//! Engine environment setup and the resident windows opened at startup.

use appshell_common::{Placement, ShellError, WindowMode};
use appshell_config::loader::resolve_relative;
use appshell_webview::EngineEnvironment;
use tracing::info;

use super::commands::{HOME_WINDOW, NOTIFY_WINDOW};
use super::core::AppContext;

impl AppContext {
    /// Engine environment derived from the `webview` config section.
    pub fn engine_environment(&self) -> EngineEnvironment {
        let webview = &self.config.webview;
        let exe_dir = appshell_config::executable_dir();
        EngineEnvironment {
            user_data_dir: resolve_relative(&exe_dir, &webview.user_data_directory),
            browser_folder: webview.resolve_browser_folder(),
            additional_arguments: Some(webview.additional_browser_arguments.clone())
                .filter(|a| !a.trim().is_empty()),
        }
    }

    /// Initialize the engine pool, start prewarming, and open the `home`
    /// (shown) and `notify` (hidden) Singleton windows.
    pub async fn start(&self) -> Result<(), ShellError> {
        self.pool.initialize(&self.engine_environment()).await?;

        // Completion is logged by the pool.
        drop(self.pool.prewarm(self.config.pool.prewarm));

        let home = self.config.router.home_url(self.port);
        let home_id = self
            .open_with_mode(
                &home,
                Placement::default(),
                WindowMode::Singleton,
                Some(HOME_WINDOW),
                true,
            )
            .await?;

        let menu = self.config.router.taskbar_menu_url(self.port);
        let notify_id = self
            .open_with_mode(
                &menu,
                Placement::default(),
                WindowMode::Singleton,
                Some(NOTIFY_WINDOW),
                false,
            )
            .await?;

        info!(home = %home_id, notify = %notify_id, "resident windows ready");
        Ok(())
    }
}
