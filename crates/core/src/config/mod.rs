//! Application configuration with layered loading.
//!
//! Sources, highest precedence first:
//!
//! 1. Environment variables (`SCHEMA_BRIDGE_*`)
//! 2. TOML config file (if `SCHEMA_BRIDGE_CONFIG_FILE` is set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite schema cache.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent sent with schema requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redirect hops followed per schema request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Proxy URL for schema requests (`http.proxy` in the editor).
    #[serde(default)]
    pub http_proxy: Option<String>,

    /// Reject invalid TLS certificates (`http.proxyStrictSSL` in the editor).
    #[serde(default = "default_true")]
    pub http_proxy_strict_ssl: bool,

    /// Prefix of the schema status text.
    #[serde(default = "default_status_text")]
    pub status_text: String,

    /// Installed extension directories scanned for schema associations.
    ///
    /// Set via SCHEMA_BRIDGE_EXTENSION_DIRS (comma-separated) or a TOML list.
    #[serde(default)]
    pub extension_dirs: Vec<PathBuf>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./yaml-schema-cache.sqlite")
}

fn default_user_agent() -> String {
    "yaml-schema-bridge/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_status_text() -> String {
    "yaml".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            http_proxy: None,
            http_proxy_strict_ssl: true,
            status_text: default_status_text(),
            extension_dirs: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or parsed, or if the
    /// merged values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SCHEMA_BRIDGE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        let config: Self = figment
            .merge(
                Env::prefixed("SCHEMA_BRIDGE_")
                    .ignore(&["CONFIG_FILE", "EXTENSION_DIRS"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        let config = match std::env::var("SCHEMA_BRIDGE_EXTENSION_DIRS") {
            Ok(dirs) => Self { extension_dirs: split_paths(&dirs), ..config },
            Err(_) => config,
        };

        config.validate()?;

        Ok(config)
    }
}

fn split_paths(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
