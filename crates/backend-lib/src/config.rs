// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::oauth2::{ClientRegistration, DEFAULT_AUTHORIZATION_REQUEST_BASE_URI};

/// Prefix for environment overrides, e.g. `VIZBOARD_JWT_TOKEN__SECRET`
pub const ENV_PREFIX: &str = "VIZBOARD_";

/// Signing secret used when none is configured. Only fit for development.
pub const DEFAULT_JWT_SECRET: &str = "vizboard-development-secret";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub jwt_token: JwtTokenSettings,
    pub statistic: StatisticSettings,
    /// Federated identity providers; absent means no registry
    pub oauth2: Option<OAuth2Settings>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Prefix of every API route
    pub base_path: String,
}

/// User store location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtTokenSettings {
    pub secret: String,
    /// Token validity in milliseconds
    pub timeout_ms: u64,
}

/// Usage statistics toggle surfaced to clients at login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticSettings {
    pub enable: bool,
}

/// Configured OAuth2 clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2Settings {
    pub authorization_base_uri: String,
    pub clients: Vec<ClientRegistration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            jwt_token: JwtTokenSettings::default(),
            statistic: StatisticSettings::default(),
            oauth2: None,
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_path: "/api".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for JwtTokenSettings {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            timeout_ms: 30 * 60 * 1000, // 30 minutes
        }
    }
}

impl Default for OAuth2Settings {
    fn default() -> Self {
        Self {
            authorization_base_uri: DEFAULT_AUTHORIZATION_REQUEST_BASE_URI.to_string(),
            clients: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file plus the environment.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the rest of the server relies on
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        let base = &self.server.base_path;
        if !base.starts_with('/') || base.len() < 2 || base.ends_with('/') {
            bail!("server.base_path must look like `/api`, got `{base}`");
        }
        if self.jwt_token.secret.trim().is_empty() {
            bail!("jwt_token.secret must not be empty");
        }
        if self.jwt_token.timeout_ms == 0 {
            bail!("jwt_token.timeout_ms must be positive");
        }
        if let Some(oauth2) = &self.oauth2 {
            if oauth2.authorization_base_uri.is_empty() {
                bail!("oauth2.authorization_base_uri must not be empty");
            }
            if let Some(client) = oauth2
                .clients
                .iter()
                .find(|c| c.registration_id.trim().is_empty())
            {
                bail!("oauth2 client `{}` has no registration_id", client.client_name);
            }
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_token.secret == DEFAULT_JWT_SECRET
    }
}
