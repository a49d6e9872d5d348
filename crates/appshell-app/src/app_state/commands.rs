//! Window commands behind the control-plane routes.
//!
//! Each command resolves its target from the shared registry on the calling
//! task, then hops to the UI thread for the actual mutation. Unknown windows
//! resolve to `Ok(false)` and nothing happens.

use std::time::Instant;

use appshell_common::{Placement, ShellError, ShellEvent, WindowId, WindowMode};
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info};

use super::core::AppContext;
use super::host::DragOutcome;

/// Name of the resident home window.
pub const HOME_WINDOW: &str = "home";
/// Name of the hidden taskbar-menu window.
pub const NOTIFY_WINDOW: &str = "notify";

impl AppContext {
    /// Open a Normal window. Resident windows are also registered under the
    /// URL path so later lookups by name find them.
    pub async fn open_window(
        &self,
        url: &str,
        placement: Placement,
        resident: bool,
    ) -> Result<WindowId, ShellError> {
        let name = if resident { resident_name(url) } else { None };
        self.open_with_mode(url, placement, WindowMode::Normal, name.as_deref(), true)
            .await
    }

    /// Store `data` for the page and open it. Without an explicit id one is
    /// generated and appended to the URL as `data_id`.
    pub async fn open_window_with_data(
        &self,
        url: &str,
        placement: Placement,
        data: Value,
        data_id: Option<String>,
    ) -> Result<(WindowId, String), ShellError> {
        let (url, data_id) = match data_id {
            Some(id) => (url.to_string(), id),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                (with_query_param(url, "data_id", &id), id)
            }
        };
        self.data.put(data_id.clone(), data);
        let window = self.open_window(&url, placement, false).await?;
        Ok((window, data_id))
    }

    /// Register, take an engine from the pool and open the window on the UI
    /// thread. The registration is rolled back if any step fails.
    pub async fn open_with_mode(
        &self,
        url: &str,
        placement: Placement,
        mode: WindowMode,
        name: Option<&str>,
        visible: bool,
    ) -> Result<WindowId, ShellError> {
        let id = self.registry.register(mode, name);

        let result = async {
            let engine = self.pool.acquire().await?;
            let url = url.to_string();
            self.ui
                .invoke(move |cx| cx.host.open(id, engine, &url, &placement, visible))
                .await??;
            Ok::<(), ShellError>(())
        }
        .await;

        match result {
            Ok(()) => Ok(id),
            Err(e) => {
                self.registry.unregister(id);
                Err(e)
            }
        }
    }

    pub async fn close_window(&self, id: WindowId) -> Result<bool, ShellError> {
        if !self.registry.contains(id) {
            debug!(window = %id, "close: unknown window");
            return Ok(false);
        }
        Ok(self.ui.invoke(move |cx| cx.host.close(id)).await?)
    }

    pub async fn show_window(&self, id: WindowId) -> Result<bool, ShellError> {
        if !self.registry.contains(id) {
            return Ok(false);
        }
        Ok(self.ui.invoke(move |cx| cx.host.show(id)).await?)
    }

    pub async fn maximize_window(&self, id: WindowId) -> Result<bool, ShellError> {
        if !self.registry.contains(id) {
            return Ok(false);
        }
        Ok(self.ui.invoke(move |cx| cx.host.maximize(id)).await?)
    }

    pub async fn minimize_window(&self, id: WindowId) -> Result<bool, ShellError> {
        if !self.registry.contains(id) {
            return Ok(false);
        }
        Ok(self.ui.invoke(move |cx| cx.host.minimize(id)).await?)
    }

    /// Drag a borderless window from page content. The timestamp is taken
    /// when the request arrives, not when the UI thread gets to it.
    pub async fn mouse_down_drag(&self, id: WindowId) -> Result<DragOutcome, ShellError> {
        if !self.registry.contains(id) {
            return Ok(DragOutcome::Unknown);
        }
        let now = Instant::now();
        Ok(self
            .ui
            .invoke(move |cx| cx.host.mouse_down_drag(id, now))
            .await?)
    }

    /// Show the resident home window, if there is one.
    pub async fn show_home(&self) -> Result<bool, ShellError> {
        match self.registry.resolve_by_name(HOME_WINDOW) {
            Some(entry) => self.show_window(entry.id).await,
            None => Ok(false),
        }
    }

    /// Ask the whole process to stop.
    pub fn request_exit(&self) {
        info!("exit requested");
        self.bus.publish(ShellEvent::Shutdown);
        if let Err(e) = self.ui.post(|cx| cx.host.request_exit()) {
            debug!(error = %e, "ui thread already gone");
        }
    }
}

/// Symbolic name of a resident window: the URL path without query or
/// fragment, leading slash removed, percent-decoded. Empty paths get no name.
pub fn resident_name(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(trimmed)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| trimmed.to_string());
    Some(decoded)
}

/// Append `key=value` to the query string of `url`.
pub fn with_query_param(url: &str, key: &str, value: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair(key, value);
            parsed.to_string()
        }
        Err(_) => {
            let (base, fragment) = match url.split_once('#') {
                Some((base, fragment)) => (base, Some(fragment)),
                None => (url, None),
            };
            let separator = if base.contains('?') { '&' } else { '?' };
            let mut out = format!(
                "{base}{separator}{key}={}",
                urlencoding::encode(value)
            );
            if let Some(fragment) = fragment {
                out.push('#');
                out.push_str(fragment);
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resident_name_is_url_path() {
        assert_eq!(
            resident_name("http://127.0.0.1:12332/reports/daily?x=1#top").as_deref(),
            Some("reports/daily")
        );
        assert_eq!(
            resident_name("https://example.com/my%20app").as_deref(),
            Some("my app")
        );
        assert_eq!(resident_name("http://example.com/"), None);
    }

    #[test]
    fn resident_name_of_relative_url() {
        assert_eq!(resident_name("/settings?tab=1").as_deref(), Some("settings"));
    }

    #[test]
    fn query_param_is_appended() {
        assert_eq!(
            with_query_param("http://localhost:3000/view", "data_id", "abc"),
            "http://localhost:3000/view?data_id=abc"
        );
        assert_eq!(
            with_query_param("http://localhost:3000/view?mode=x", "data_id", "abc"),
            "http://localhost:3000/view?mode=x&data_id=abc"
        );
    }

    #[test]
    fn query_param_on_relative_url_keeps_fragment() {
        assert_eq!(
            with_query_param("/view?a=1#frag", "data_id", "a b"),
            "/view?a=1&data_id=a%20b#frag"
        );
    }
}
