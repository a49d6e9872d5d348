//! Engine creation for the pool, performed on the UI thread.

use appshell_common::{EngineId, PoolError};
use appshell_webview::{EngineEnvironment, EngineFactory};
use async_trait::async_trait;

use super::dispatch::UiDispatcher;

/// Builds engines by hopping onto the UI thread, where the active
/// [`SurfaceFactory`](appshell_webview::SurfaceFactory) lives.
pub struct UiEngineFactory {
    ui: UiDispatcher,
}

impl UiEngineFactory {
    pub fn new(ui: UiDispatcher) -> Self {
        Self { ui }
    }
}

#[async_trait]
impl EngineFactory for UiEngineFactory {
    async fn initialize(&self, env: &EngineEnvironment) -> Result<(), PoolError> {
        let env = env.clone();
        self.ui
            .invoke(move |cx| cx.factory.initialize(&env))
            .await
            .map_err(|e| PoolError::Initialization(e.to_string()))?
            .map_err(|e| PoolError::Initialization(e.to_string()))
    }

    async fn create(&self, id: EngineId) -> Result<(), PoolError> {
        self.ui
            .invoke(move |cx| {
                let surface = cx.factory.create(id, cx.host.events())?;
                cx.host.adopt_surface(id, surface);
                Ok::<(), appshell_common::SurfaceError>(())
            })
            .await
            .map_err(|e| PoolError::CreationFailed(e.to_string()))?
            .map_err(|e| PoolError::CreationFailed(e.to_string()))
    }
}
