use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BrewlogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssetsConfig {
    /// Upstream the worker fetches from on install and on cache miss.
    pub origin: String,
    pub cache_prefix: String,
    pub cache_version: String,
    pub cache_path: String,
    pub files: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "~/.brewlog/journal.db".into(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:3000".into(),
            cache_prefix: "brewlog".into(),
            cache_version: "v1".into(),
            cache_path: "~/.brewlog/assets.db".into(),
            files: [
                "/index.html",
                "/style.css",
                "/app.js",
                "/img/icon-192x192.png",
                "/img/icon-512x512.png",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl AssetsConfig {
    /// Versioned cache name, e.g. `brewlog-v1`.
    pub fn cache_name(&self) -> String {
        crate::assets::cache_name(&self.cache_prefix, &self.cache_version)
    }

    pub fn resolved_cache_path(&self) -> PathBuf {
        expand_tilde(&self.cache_path)
    }
}

/// Returns `~/.brewlog/`, or `./.brewlog/` when there is no home directory.
pub fn default_brewlog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".brewlog")
}

/// Returns the default config file path: `~/.brewlog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_brewlog_dir().join("config.toml")
}

impl BrewlogConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            BrewlogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (BREWLOG_DB, BREWLOG_LOG_LEVEL, BREWLOG_ORIGIN).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BREWLOG_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("BREWLOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("BREWLOG_ORIGIN") {
            self.assets.origin = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BrewlogConfig::default();
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.port, 8080);
        assert!(config.storage.db_path.ends_with("journal.db"));
        assert_eq!(config.assets.cache_name(), "brewlog-v1");
        assert_eq!(config.assets.files.len(), 5);
        assert!(config.assets.files.contains(&"/index.html".to_string()));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"

[storage]
db_path = "/tmp/test.db"

[assets]
cache_version = "v2"
files = ["/index.html"]
"#;
        let config: BrewlogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.assets.cache_name(), "brewlog-v2");
        assert_eq!(config.assets.files, vec!["/index.html".to_string()]);
        // defaults still apply for unset fields
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.assets.origin, "http://127.0.0.1:3000");
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = BrewlogConfig::default();
        std::env::set_var("BREWLOG_DB", "/tmp/override.db");
        std::env::set_var("BREWLOG_LOG_LEVEL", "trace");
        std::env::set_var("BREWLOG_ORIGIN", "http://cdn.local");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.assets.origin, "http://cdn.local");

        // Clean up
        std::env::remove_var("BREWLOG_DB");
        std::env::remove_var("BREWLOG_LOG_LEVEL");
        std::env::remove_var("BREWLOG_ORIGIN");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/db.sqlite"), PathBuf::from("/var/db.sqlite"));
    }
}
