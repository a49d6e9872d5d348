//! Local control plane: HTTP + WebSocket routes that hosted pages call to
//! drive their own windows.
//!
//! Served on loopback only. Everything outside `/api/v1/app/` falls through
//! to the static directory.

pub mod clipboard;
pub mod data_cache;
mod handlers;
pub mod hub;
pub mod protocol;


use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use appshell_common::ShellError;
use appshell_webview::bootstrap::API_PREFIX;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::app_state::AppContext;

/// Build the full router: API routes, static fallback, permissive CORS.
pub fn router(ctx: Arc<AppContext>, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/exit", get(handlers::exit).post(handlers::exit))
        .route("/close/{id}", get(handlers::close).post(handlers::close))
        .route("/open", post(handlers::open))
        .route("/openwithdata", post(handlers::open_with_data))
        .route(
            "/getdatabyid/{id}",
            get(handlers::get_data_by_id).post(handlers::get_data_by_id),
        )
        .route("/maximize/{id}", get(handlers::maximize).post(handlers::maximize))
        .route("/minimize/{id}", get(handlers::minimize).post(handlers::minimize))
        .route("/show/{id}", get(handlers::show).post(handlers::show))
        .route("/home", get(handlers::home).post(handlers::home))
        .route(
            "/mousedowndrag/{id}",
            get(handlers::mouse_down_drag).post(handlers::mouse_down_drag),
        )
        .route("/copy", post(handlers::copy))
        .route("/broadcast", get(handlers::broadcast));

    Router::new()
        .nest(API_PREFIX, api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Bind the loopback listener. Port 0 picks a free port.
pub async fn bind(port: u16) -> Result<TcpListener, ShellError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| ShellError::Server(format!("cannot bind {addr}: {e}")))
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ShellError> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "control plane listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ShellError::Server(e.to_string()))?;
    tracing::info!("control plane stopped");
    Ok(())
}
