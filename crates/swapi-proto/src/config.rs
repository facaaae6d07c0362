use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::platform;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "SWSEARCH_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the SWAPI mirror, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many `next` links to follow per query. 1 means the first page only.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Toast expiry / redraw tick in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://swapi.py4e.com/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_pages() -> usize {
    1
}

fn default_user_agent() -> String {
    concat!("swsearch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_tick_ms() -> u64 {
    100
}

impl Config {
    /// Load from the default location, writing defaults on first run. An
    /// unreadable file falls back to defaults; `SWSEARCH_API_URL` applies
    /// either way.
    pub fn load() -> Self {
        let env_url = std::env::var(API_URL_ENV).ok();
        Self::load_or_default(&Self::config_path()).with_api_url_override(env_url.as_deref())
    }

    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("config load failed, using defaults: {:#}", e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Replace `api.base_url` with `url` unless it is absent or blank.
    pub fn with_api_url_override(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api.base_url = url.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://swapi.py4e.com/api");
        assert_eq!(config.api.max_pages, 1);
        assert!(config.api.user_agent.starts_with("swsearch/"));
        assert_eq!(config.ui.tick_ms, 100);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[api]\nmax_pages = 3\n").unwrap();
        assert_eq!(config.api.max_pages, 3);
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.ui.tick_ms, 100);
    }

    #[test]
    fn test_load_from_writes_defaults_on_first_run() {
        let path = platform::temp_dir()
            .join(format!("swsearch-config-test-{}", std::process::id()))
            .join("config.toml");
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api.timeout_secs, config.api.timeout_secs);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    fn scratch_path(name: &str) -> PathBuf {
        platform::temp_dir()
            .join(format!("swsearch-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let path = scratch_path("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        assert!(Config::load_from(&path).is_err());
        let config = Config::load_or_default(&path);
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
        assert_eq!(config.ui.tick_ms, 100);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_env_url_overrides_broken_file() {
        let path = scratch_path("broken-env");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not = [valid").unwrap();

        let config = Config::load_or_default(&path)
            .with_api_url_override(Some("http://mirror.local/api"));
        assert_eq!(config.api.base_url, "http://mirror.local/api");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_env_url_overrides_file_value() {
        let config: Config = toml::from_str("[api]\nbase_url = \"http://file.local/api\"\n").unwrap();
        let config = config.with_api_url_override(Some("  http://mirror.local/api "));
        assert_eq!(config.api.base_url, "http://mirror.local/api");
    }

    #[test]
    fn test_blank_or_missing_env_url_is_ignored() {
        let config = Config::default().with_api_url_override(Some("   "));
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
        let config = Config::default().with_api_url_override(None);
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
    }
}
