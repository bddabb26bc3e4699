//! Runtime configuration.
//!
//! Values come from three places, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `<config dir>/savvy-planner/config.toml`, if present
//!    (`~/.config/savvy-planner/config.toml` on Linux)
//! 3. Environment variables `SAVVY_API_URL`, `SAVVY_USER_ID`, `SAVVY_LOG`,
//!    `SAVVY_START_ROUTE`
//!
//! ```toml
//! api_base_url = "http://192.168.1.9:8000"
//! user_id = 1
//! log_level = "debug"
//! start_route = "pantry"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the planner backend listens. Every request is made relative to it.
    pub api_base_url: String,

    /// Stands in for a signed-in user until there is a login flow.
    pub user_id: u64,

    /// `tracing` filter directive. `RUST_LOG` still takes priority.
    pub log_level: String,

    /// Route to show first (`index`, `pantry`, `profile`, `shoppinglist`).
    pub start_route: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            user_id: 1,
            log_level: "info".to_string(),
            start_route: None,
        }
    }
}

impl Config {
    /// Load defaults, the config file and environment overrides, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path where the config file is looked up
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("savvy-planner");
        path.push("config.toml");
        Some(path)
    }

    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply `SAVVY_*` overrides from `lookup` (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SAVVY_API_URL") {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup("SAVVY_USER_ID") {
            self.user_id = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidUserId(raw.clone()))?;
        }
        if let Some(level) = lookup("SAVVY_LOG") {
            self.log_level = level;
        }
        if let Some(route) = lookup("SAVVY_START_ROUTE") {
            self.start_route = Some(route);
        }
        Ok(())
    }

    /// Check that the backend URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason: reason.to_string(),
        };

        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| invalid(&e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(&format!("unsupported scheme {other:?}"))),
        }
        if url.cannot_be_a_base() {
            return Err(invalid("cannot be used as a base"));
        }
        Ok(())
    }
}
