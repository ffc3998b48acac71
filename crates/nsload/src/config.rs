//! Loader configuration (nsload.toml)
//!
//! ```toml
//! repositories = ["js/private", "lib"]
//! error_level = "warn"
//! extension = "js"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::ErrorLevel;
use crate::path::DEFAULT_EXTENSION;
use crate::repository::DEFAULT_REPOSITORIES;

/// Configuration file name
pub const CONFIG_FILE: &str = "nsload.toml";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Repositories in search order
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    /// How load failures are surfaced
    #[serde(default)]
    pub error_level: ErrorLevel,

    /// Module file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_repositories() -> Vec<String> {
    DEFAULT_REPOSITORIES.iter().map(|s| s.to_string()).collect()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            repositories: default_repositories(),
            error_level: ErrorLevel::default(),
            extension: default_extension(),
        }
    }
}

impl LoaderConfig {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: LoaderConfig = toml::from_str(content)?;
        config.validate()?;
        if let Some(stripped) = config.extension.strip_prefix('.') {
            config.extension = stripped.to_string();
        }
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::ValidationError(
                "Extension cannot be empty".to_string(),
            ));
        }

        if self.extension.contains('/') {
            return Err(ConfigError::ValidationError(format!(
                "Invalid extension: {}",
                self.extension
            )));
        }

        if let Some(empty) = self.repositories.iter().position(|r| r.is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "Repository #{} is empty",
                empty + 1
            )));
        }

        Ok(())
    }

    /// Write config to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Find the nearest nsload.toml, walking up from `start_dir`
///
/// Falls back to `~/.nsload/nsload.toml` if present.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }

    let global = dirs::home_dir()?.join(".nsload").join(CONFIG_FILE);
    global.is_file().then_some(global)
}
