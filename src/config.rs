//! Configuration for the internal diagnostics handler.
//!
//! This module handles loading and validating the settings that control where
//! the built-in endpoints are mounted and how the index page is titled. It
//! supports YAML, JSON, and TOML formats.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

// Default configuration constants
pub const DEFAULT_TITLE: &str = "Internal";
pub const DEFAULT_LIVE_PATH: &str = "/live";
pub const DEFAULT_READY_PATH: &str = "/ready";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Errors raised while loading or validating a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("{field} '{path}' must start with '/' and must not be the index path")]
    InvalidPath { field: &'static str, path: String },
}

/// Settings for the built-in endpoints and the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title of the generated index page.
    pub title: String,

    /// Path serving liveness checks.
    #[serde(alias = "live-path")]
    pub live_path: String,

    /// Path serving readiness checks.
    #[serde(alias = "ready-path")]
    pub ready_path: String,

    /// Path serving Prometheus metrics.
    #[serde(alias = "metrics-path")]
    pub metrics_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            live_path: DEFAULT_LIVE_PATH.to_string(),
            ready_path: DEFAULT_READY_PATH.to_string(),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, picking the format from the file
    /// extension (`.json`, `.toml`, YAML otherwise).
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        info!("Loaded configuration from: {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Validates the effective configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }

        for (field, path) in [
            ("live_path", &self.live_path),
            ("ready_path", &self.ready_path),
            ("metrics_path", &self.metrics_path),
        ] {
            if !path.starts_with('/') || path == "/" {
                return Err(ConfigError::InvalidPath {
                    field,
                    path: path.clone(),
                });
            }
        }

        Ok(())
    }
}
