//! Shared application state handed to every control-plane handler.

use std::sync::Arc;

use appshell_common::EventBus;
use appshell_config::AppConfig;
use appshell_webview::bootstrap::api_base;
use appshell_webview::{EnginePool, PoolSettings, WindowRegistry};

use crate::control::clipboard::TextClipboard;
use crate::control::data_cache::DataCache;
use crate::control::hub::BroadcastHub;

use super::dispatch::UiDispatcher;
use super::factory::UiEngineFactory;
use super::host::WindowHost;

/// Everything the control plane needs, owned in one place and shared by
/// `Arc`. Each test builds its own.
pub struct AppContext {
    pub config: AppConfig,
    /// Port the control plane listens on.
    pub port: u16,
    pub registry: Arc<WindowRegistry>,
    pub pool: EnginePool,
    pub hub: BroadcastHub,
    pub data: DataCache,
    pub ui: UiDispatcher,
    pub bus: EventBus,
    pub clipboard: Arc<dyn TextClipboard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        port: u16,
        ui: UiDispatcher,
        clipboard: Arc<dyn TextClipboard>,
    ) -> Self {
        let settings = PoolSettings {
            acquire_timeout: config.pool.acquire_timeout(),
            create_retries: config.pool.create_retries,
            retry_backoff: config.pool.retry_backoff(),
        };
        let pool = EnginePool::new(Arc::new(UiEngineFactory::new(ui.clone())), settings);
        let hub = BroadcastHub::new(config.broadcast.send_timeout());

        Self {
            config,
            port,
            registry: Arc::new(WindowRegistry::new()),
            pool,
            hub,
            data: DataCache::new(),
            ui,
            bus: EventBus::new(256),
            clipboard,
        }
    }

    /// Build the UI-thread half that pairs with this context.
    pub fn window_host(&self) -> WindowHost {
        WindowHost::new(
            Arc::clone(&self.registry),
            self.pool.clone(),
            self.bus.clone(),
            api_base(self.port),
        )
    }
}
