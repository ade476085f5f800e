use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::currency::{DEFAULT_FROM, DEFAULT_TO};
use crate::core::rates::BASE_CURRENCY;
use crate::providers::exchangerate_api::DEFAULT_BASE_URL;

pub const DEFAULT_PAGE_URL: &str = "https://calculadorafinanciera.es/calculadora-divisas";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ShareConfig {
    /// Link appended to shared text.
    #[serde(default = "default_page_url")]
    pub url: String,
    /// External program receiving the share text on stdin. Empty means the
    /// system clipboard is used instead.
    #[serde(default)]
    pub command: Vec<String>,
}

fn default_page_url() -> String {
    DEFAULT_PAGE_URL.to_string()
}

fn default_base_currency() -> String {
    BASE_CURRENCY.to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        ShareConfig {
            url: default_page_url(),
            command: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base_currency: default_base_currency(),
            defaults: DefaultsConfig::default(),
            share: ShareConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("es", "calculadorafinanciera", "divisa")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
base_currency: "EUR"
defaults:
  from: "GBP"
  to: "JPY"
share:
  url: "https://example.com/divisas"
  command: ["termux-share", "-a", "send"]
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.defaults.from, "GBP");
        assert_eq!(config.defaults.to, "JPY");
        assert_eq!(config.share.url, "https://example.com/divisas");
        assert_eq!(config.share.command, vec!["termux-share", "-a", "send"]);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("share:\n  command: []\n").unwrap();
        assert_eq!(config.provider.base_url, "https://api.exchangerate-api.com");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.defaults.from, "EUR");
        assert_eq!(config.defaults.to, "USD");
        assert_eq!(config.share.url, DEFAULT_PAGE_URL);
        assert!(config.share.command.is_empty());

        let empty: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(empty, AppConfig::default());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("nope.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_load_from_invalid_yaml_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "provider: [unclosed").unwrap();
        let result = AppConfig::load_from_path(file.path());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config file")
        );
    }
}
