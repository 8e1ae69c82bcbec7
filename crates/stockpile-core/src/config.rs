//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL override, the last used username and the offline-mode
//! flag.
//!
//! Configuration is stored at `~/.config/stockpile/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::Endpoints;

/// Application name used for config/data directory paths
const APP_NAME: &str = "stockpile";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
const API_BASE_ENV: &str = "STOCKPILE_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base: Option<String>,
    pub last_username: Option<String>,
    #[serde(default)]
    pub offline_mode: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the offline snapshot, session and logs.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Resolve the endpoint set: environment override first, then the
    /// configured base, then the built-in default.
    pub fn endpoints(&self) -> Endpoints {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            return Endpoints::from_base(&base);
        }
        match &self.api_base {
            Some(base) => Endpoints::from_base(base),
            None => Endpoints::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_base_wins_over_default() {
        let config = Config {
            api_base: Some("https://warehouse.internal/api".to_string()),
            last_username: None,
            offline_mode: false,
        };
        let endpoints = config.endpoints();
        assert_eq!(endpoints.products, "https://warehouse.internal/api/products");
    }

    #[test]
    fn test_offline_mode_defaults_off() {
        let config: Config = serde_json::from_str(r#"{"api_base": null, "last_username": "admin"}"#)
            .expect("parse config");
        assert!(!config.offline_mode);
        assert_eq!(config.last_username.as_deref(), Some("admin"));
    }
}
