//! Configuration schema types for appshell.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod router;
mod startup;
mod system;
mod webview;

pub use router::*;
pub use startup::*;
pub use system::*;
pub use webview::*;

use serde::{Deserialize, Serialize};

/// Root configuration, one-to-one with `app.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub router: RouterConfig,
    pub startup: Vec<StartupProcess>,
    pub environments: Vec<EnvironmentDirective>,
    pub webview: WebViewConfig,
    pub server: ServerConfig,
    pub pool: PoolConfig,
    pub broadcast: BroadcastConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.router.home, "/home");
        assert_eq!(config.router.taskbar_menu, "/web-application-taskbar-menu");
        assert!(config.startup.is_empty());
        assert!(config.environments.is_empty());
        assert_eq!(config.server.port, 12332);
        assert_eq!(config.server.static_dir, "build");
    }

    #[test]
    fn parses_original_app_json_layout() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "router": { "home": "/dashboard", "taskbar-menu": "http://localhost:3000/menu" },
                "startup": [
                    {
                        "path": "{.}/server.exe",
                        "args": ["--port", "9000"],
                        "working-directory": "C:/srv",
                        "create-no-window": true
                    }
                ],
                "environments": [
                    { "action": "add", "type": "user", "key": "PATH", "value": "{.}/bin" },
                    { "action": "set", "type": "process", "key": "MODE", "value": "prod" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.router.home, "/dashboard");
        assert_eq!(config.router.taskbar_menu, "http://localhost:3000/menu");

        let proc = &config.startup[0];
        assert_eq!(proc.path, "{.}/server.exe");
        assert_eq!(proc.args, vec!["--port", "9000"]);
        assert_eq!(proc.working_directory, "C:/srv");
        assert!(proc.create_no_window);

        assert_eq!(config.environments.len(), 2);
        assert_eq!(config.environments[0].action, EnvAction::Add);
        assert_eq!(config.environments[0].target, EnvTarget::User);
        assert_eq!(config.environments[1].action, EnvAction::Set);
        assert_eq!(config.environments[1].target, EnvTarget::Process);
    }

    #[test]
    fn unknown_environment_action_and_type_are_tolerated() {
        let directive: EnvironmentDirective = serde_json::from_str(
            r#"{ "action": "remove", "type": "galaxy", "key": "X", "value": "1" }"#,
        )
        .unwrap();
        assert_eq!(directive.action, EnvAction::Unknown);
        assert_eq!(directive.target, EnvTarget::Process);
    }

    #[test]
    fn startup_entry_defaults() {
        let proc: StartupProcess = serde_json::from_str(r#"{ "path": "a.exe" }"#).unwrap();
        assert!(proc.args.is_empty());
        assert!(proc.working_directory.is_empty());
        assert!(!proc.create_no_window);
    }
}
