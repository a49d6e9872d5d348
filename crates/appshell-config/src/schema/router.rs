use serde::{Deserialize, Serialize};

/// Routes of the built-in pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RouterConfig {
    /// Page shown in the resident `home` window.
    pub home: String,
    /// Page loaded into the hidden taskbar-menu window.
    pub taskbar_menu: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            home: "/home".into(),
            taskbar_menu: "/web-application-taskbar-menu".into(),
        }
    }
}

impl RouterConfig {
    /// Resolve a route against the local control-plane origin.
    /// Absolute `http(s)` URLs are returned untouched.
    pub fn absolute(route: &str, port: u16) -> String {
        if route.starts_with("http://") || route.starts_with("https://") {
            route.to_string()
        } else if route.starts_with('/') {
            format!("http://127.0.0.1:{port}{route}")
        } else {
            format!("http://127.0.0.1:{port}/{route}")
        }
    }

    pub fn home_url(&self, port: u16) -> String {
        Self::absolute(&self.home, port)
    }

    pub fn taskbar_menu_url(&self, port: u16) -> String {
        Self::absolute(&self.taskbar_menu, port)
    }
}
