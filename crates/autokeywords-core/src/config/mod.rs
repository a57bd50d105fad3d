//! Configuration management
//!
//! Service-level settings (API endpoint, timeouts, catalog location, bulk
//! pacing) live in a YAML file. Per-installation settings such as the API
//! key and selected model live in the option store, see [`crate::db::Settings`].

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Path to the model catalog file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Delay between items in bulk runs, in milliseconds
    #[serde(default = "default_bulk_delay_ms")]
    pub bulk_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            catalog_path: default_catalog_path(),
            bulk_delay_ms: default_bulk_delay_ms(),
        }
    }
}

/// Completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of an OpenAI-compatible API (without trailing `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key override; takes precedence over the stored option
    #[serde(default)]
    pub api_key: Option<String>,

    /// Generation request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Key validation request timeout in seconds
    #[serde(default = "default_validation_timeout")]
    pub validation_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: std::env::var("AUTOKEYWORDS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            timeout_secs: default_timeout(),
            validation_timeout_secs: default_validation_timeout(),
        }
    }
}

fn default_base_url() -> String {
    std::env::var("AUTOKEYWORDS_API_URL")
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_validation_timeout() -> u64 {
    10
}

fn default_catalog_path() -> PathBuf {
    std::env::var("AUTOKEYWORDS_CATALOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::CONFIG_DIR_NAME)
                .join("models.txt")
        })
}

fn default_bulk_delay_ms() -> u64 {
    1000
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a specific path, falling back to defaults when absent
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let mut config: Config = serde_yaml::from_str(&content)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    // Environment always wins over the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("AUTOKEYWORDS_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(key) = std::env::var("AUTOKEYWORDS_API_KEY") {
            if !key.is_empty() {
                self.api.api_key = Some(key);
            }
        }
        if let Ok(path) = std::env::var("AUTOKEYWORDS_CATALOG") {
            self.catalog_path = PathBuf::from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.validation_timeout_secs, 10);
        assert_eq!(config.bulk_delay_ms, 1000);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "bulk_delay_ms: 250\napi:\n  timeout_secs: 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bulk_delay_ms, 250);
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.validation_timeout_secs, 10);
    }
}
