//! Identity bootstrap injected into every hosted page.
//!
//! Pages read `window.webapplication.id` to address their own window through
//! the control plane at `window.webapplication.api`.

use appshell_common::WindowId;

/// Route prefix of the control plane, relative to its origin.
pub const API_PREFIX: &str = "/api/v1/app";

/// Control-plane base URL for a given port.
pub fn api_base(port: u16) -> String {
    format!("http://127.0.0.1:{port}{API_PREFIX}")
}

/// Script that publishes the window identity to the page and fires a
/// `webapplication` event so late listeners can pick it up.
pub fn identity_script(id: WindowId, api: &str) -> String {
    let payload = serde_json::json!({ "id": id, "api": api });
    format!(
        "window.webapplication = {payload};\
         window.dispatchEvent(new CustomEvent('webapplication', \
         {{ detail: window.webapplication }}));"
    )
}
