//! Server configuration.
//!
//! Settings come from an optional TOML file (path in `IMAGINIFY_CONFIG`),
//! overlaid with environment variables. Unset or empty variables leave the
//! file value in place.

use std::path::Path;

use imaginify_adapter_mongodb::DEFAULT_DATABASE_NAME;
use imaginify_plugin_clerk::DEFAULT_API_URL;
use imaginify_webhooks::DEFAULT_TOLERANCE_SECS;
use serde::{Deserialize, Serialize};

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "IMAGINIFY_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub database: DatabaseConfig,
    pub clerk: ClerkSettings,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Webhook verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Signing secret (`whsec_...`).
    pub secret: Option<String>,
    /// Accepted clock skew in seconds. `0` disables the timestamp check.
    pub tolerance_secs: i64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

/// Which user repository to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// In-process store; data is lost on restart.
    Memory,
    #[default]
    Mongodb,
}

/// User store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// Connection string.
    pub url: Option<String>,
    /// Database name.
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: None,
            name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }
}

/// Identity-provider API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClerkSettings {
    /// Backend API secret key. Metadata write-back is skipped without it.
    pub secret_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for ClerkSettings {
    fn default() -> Self {
        Self {
            secret_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Loads the config file named by `IMAGINIFY_CONFIG`, if any, then applies
    /// the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text. Missing sections and fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Overlays values from `lookup`, typically `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "PORT".to_string(),
                    value: port,
                })?;
        }
        if let Some(secret) = var("WEBHOOK_SECRET") {
            self.webhook.secret = Some(secret);
        }
        // MONGOOSE_URL is the legacy name.
        if let Some(url) = var("MONGODB_URL").or_else(|| var("MONGOOSE_URL")) {
            self.database.url = Some(url);
        }
        if let Some(name) = var("MONGODB_DB_NAME") {
            self.database.name = name;
        }
        if let Some(key) = var("CLERK_SECRET_KEY") {
            self.clerk.secret_key = Some(key);
        }
        if let Some(url) = var("CLERK_API_URL") {
            self.clerk.api_url = url;
        }
        Ok(())
    }

    /// Returns the `host:port` listen address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
