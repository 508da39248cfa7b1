//! Configuration loading and defaults.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Environment variables** — `SMSGW_HTTP_LISTEN`, `SMSGW_CONSOLE_LISTEN`
//! 2. **Config file** — path via `--config <path>`, or `smsgw.toml` in CWD
//! 3. **Compiled defaults** — see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [server]
//! http_listen = "0.0.0.0:1401"
//! console_listen = "0.0.0.0:8990"
//! service_name = "SMS Gateway"
//! max_console_sessions = 20
//! console_idle_timeout_secs = 300
//! probe_timeout_ms = 1000
//!
//! [logging]
//! level = "info"
//!
//! [[users]]
//! username = "admin"
//! password = "admin123"
//!
//! [[backends]]
//! name = "smpp"
//! host = "127.0.0.1"
//! port = 2775
//! ```

use serde::Deserialize;
use std::path::Path;

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Credential store entries. Defaults to the single `admin` user, which
    /// triggers a startup warning.
    #[serde(default = "default_users")]
    pub users: Vec<UserConfig>,
    /// Backend services whose reachability `/health` reports.
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendConfig>,
}

/// Listener addresses and resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address for the HTTP facade (default `0.0.0.0:1401`).
    #[serde(default = "default_http_listen")]
    pub http_listen: String,
    /// Socket address for the admin console (default `0.0.0.0:8990`).
    #[serde(default = "default_console_listen")]
    pub console_listen: String,
    /// Service name reported by `GET /status` (default `SMS Gateway`).
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Maximum concurrent console sessions (default 20).
    #[serde(default = "default_max_console_sessions")]
    pub max_console_sessions: usize,
    /// Seconds a console session may sit idle between lines before it is
    /// closed (default 300).
    #[serde(default = "default_console_idle_timeout_secs")]
    pub console_idle_timeout_secs: u64,
    /// Per-backend TCP connect bound for health probes in milliseconds
    /// (default 1000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `info`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// One credential store entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
}

/// One health-probe target.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}

fn default_http_listen() -> String {
    "0.0.0.0:1401".to_string()
}
fn default_console_listen() -> String {
    "0.0.0.0:8990".to_string()
}
fn default_service_name() -> String {
    "SMS Gateway".to_string()
}
fn default_max_console_sessions() -> usize {
    20
}
fn default_console_idle_timeout_secs() -> u64 {
    300
}
fn default_probe_timeout_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

fn default_users() -> Vec<UserConfig> {
    vec![UserConfig {
        username: "admin".to_string(),
        password: "admin123".to_string(),
    }]
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig {
            name: "smpp".to_string(),
            host: "127.0.0.1".to_string(),
            port: 2775,
        },
        BackendConfig {
            name: "redis".to_string(),
            host: "127.0.0.1".to_string(),
            port: 6379,
        },
        BackendConfig {
            name: "rabbitmq".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5672,
        },
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_listen: default_http_listen(),
            console_listen: default_console_listen(),
            service_name: default_service_name(),
            max_console_sessions: default_max_console_sessions(),
            console_idle_timeout_secs: default_console_idle_timeout_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration with the precedence chain: env vars > file > defaults.
    ///
    /// If `path` is `Some`, reads that file (panics on failure). Otherwise looks
    /// for `smsgw.toml` in the current directory, falling back to compiled
    /// defaults.
    pub fn load(path: Option<&str>) -> Self {
        let mut config = if let Some(p) = path {
            let content = std::fs::read_to_string(p)
                .unwrap_or_else(|e| panic!("Failed to read config file {p}: {e}"));
            toml::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse config file {p}: {e}"))
        } else if Path::new("smsgw.toml").exists() {
            let content =
                std::fs::read_to_string("smsgw.toml").expect("Failed to read smsgw.toml");
            toml::from_str(&content).expect("Failed to parse smsgw.toml")
        } else {
            Config {
                server: ServerConfig::default(),
                logging: LoggingConfig::default(),
                users: default_users(),
                backends: default_backends(),
            }
        };

        // Env var overrides
        if let Ok(listen) = std::env::var("SMSGW_HTTP_LISTEN") {
            config.server.http_listen = listen;
        }
        if let Ok(listen) = std::env::var("SMSGW_CONSOLE_LISTEN") {
            config.server.console_listen = listen;
        }

        config
    }

    /// Whether the compiled-in default credentials are still active.
    pub fn has_default_credentials(&self) -> bool {
        self.users
            .iter()
            .any(|u| u.username == "admin" && u.password == "admin123")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.server.http_listen, "0.0.0.0:1401");
        assert_eq!(config.server.console_listen, "0.0.0.0:8990");
        assert_eq!(config.server.max_console_sessions, 20);
        assert_eq!(config.server.probe_timeout_ms, 1000);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.backends.len(), 3);
        assert!(config.has_default_credentials());
    }

    #[test]
    fn test_parse_full() {
        let toml = r#"
            [server]
            http_listen = "127.0.0.1:8080"
            console_listen = "127.0.0.1:9990"
            max_console_sessions = 5

            [logging]
            level = "debug"

            [[users]]
            username = "ops"
            password = "s3cret"

            [[backends]]
            name = "smpp"
            host = "smpp.internal"
            port = 2775
        "#;
        let config: Config = toml::from_str(toml).expect("config should parse");
        assert_eq!(config.server.http_listen, "127.0.0.1:8080");
        assert_eq!(config.server.max_console_sessions, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.users[0].username, "ops");
        assert_eq!(config.backends[0].host, "smpp.internal");
        assert!(!config.has_default_credentials());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[server]\nhttp_listen = \"0.0.0.0:1402\"")
            .expect("partial config should parse");
        assert_eq!(config.server.http_listen, "0.0.0.0:1402");
        assert_eq!(config.server.console_listen, "0.0.0.0:8990");
    }
}
