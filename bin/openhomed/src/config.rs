//! Server configuration, loaded from a TOML file.
//!
//! A bare name resolves to `/etc/openhome/<name>.toml`; anything
//! containing `/` or `.` is used as a path directly.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the SQLite and redb files.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret the upstream identity provider signs tokens with.
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// See notify::service::NotifyConfig::suppress_self_reply.
    pub suppress_self_reply: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            jwt: JwtConfig::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // Development fallback. verify_config() warns about it.
            secret: "openhome-dev-secret-change-me".to_string(),
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            suppress_self_reply: false,
        }
    }
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/openhome/{name_or_path}.toml"))
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
        let config = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("cannot parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Sanity checks before serving traffic.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage.data_dir is empty in configuration");
        }
        if self.jwt.secret.is_empty() {
            anyhow::bail!("jwt.secret is empty in configuration");
        }
        if self.jwt.secret == JwtConfig::default().secret {
            tracing::warn!("using the built-in development JWT secret; set jwt.secret for production");
        }
        Ok(())
    }
}
