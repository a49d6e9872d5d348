//! wry-backed engine construction.
//!
//! Each engine is a top-level webview filling its own window. Page-load and
//! title callbacks are forwarded to an [`EventSink`].

use appshell_common::{EngineId, SurfaceError};
use tracing::{debug, info};
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::events::{EngineEvent, EventSink, PageLoadState};
use crate::types::EngineEnvironment;

/// Apply the shared environment. WebView2 reads these variables when each
/// engine starts, so they must be set before the first `build_engine`.
pub fn apply_environment(env: &EngineEnvironment) -> Result<(), SurfaceError> {
    std::fs::create_dir_all(&env.user_data_dir).map_err(|e| {
        SurfaceError::Engine(format!(
            "cannot create user data directory {}: {e}",
            env.user_data_dir.display()
        ))
    })?;
    std::env::set_var("WEBVIEW2_USER_DATA_FOLDER", &env.user_data_dir);

    if let Some(folder) = &env.browser_folder {
        std::env::set_var("WEBVIEW2_BROWSER_EXECUTABLE_FOLDER", folder);
    }
    if let Some(args) = env.additional_arguments.as_deref().filter(|a| !a.is_empty()) {
        std::env::set_var("WEBVIEW2_ADDITIONAL_BROWSER_ARGUMENTS", args);
    }

    info!(
        user_data = %env.user_data_dir.display(),
        browser_folder = ?env.browser_folder,
        "engine environment applied"
    );
    Ok(())
}

/// Build a hidden engine on `window`, parked on `about:blank`.
pub fn build_engine<W: raw_window_handle::HasWindowHandle>(
    window: &W,
    id: EngineId,
    events: EventSink,
) -> Result<wry::WebView, SurfaceError> {
    let builder = WebViewBuilder::new()
        .with_url("about:blank")
        .with_devtools(cfg!(debug_assertions))
        .with_clipboard(true)
        .with_autoplay(true)
        .with_focused(false);

    let builder = attach_page_load_handler(builder, events.clone(), id);
    let builder = attach_title_handler(builder, events, id);

    let webview = builder
        .build(window)
        .map_err(|e| SurfaceError::Engine(e.to_string()))?;
    debug!(engine = %id, "engine built");
    Ok(webview)
}

fn attach_page_load_handler(
    builder: WebViewBuilder<'_>,
    events: EventSink,
    engine: EngineId,
) -> WebViewBuilder<'_> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(%engine, ?state, url = %url, "page load");
        events.push(EngineEvent::PageLoad { engine, state, url });
    })
}

fn attach_title_handler(
    builder: WebViewBuilder<'_>,
    events: EventSink,
    engine: EngineId,
) -> WebViewBuilder<'_> {
    builder.with_document_title_changed_handler(move |title| {
        debug!(%engine, title = %title, "title changed");
        events.push(EngineEvent::TitleChanged { engine, title });
    })
}
