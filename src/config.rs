//! Configuration management for ollama-chat
//!
//! Provides TOML-based configuration with built-in defaults.
//! Location: ~/.ollama-chat/config.toml
//!
//! ```toml
//! [server]
//! url = "http://127.0.0.1:11434/api/chat"
//! model = "llama3.2:latest"
//! timeout_secs = 300
//! ```

use crate::errors::{ChatError, Result};
use crate::streaming::{DEFAULT_CHAT_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Chat endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CHAT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    ///
    /// Values are not validated here; command-line overrides may still
    /// replace them.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ChatError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ollama-chat").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = self.server.url.trim();
        if url.is_empty() {
            return Err(ChatError::Config("url must not be empty".to_string()));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ChatError::Config(format!(
                "url must start with http:// or https://: {}",
                url
            )));
        }

        if self.server.model.trim().is_empty() {
            return Err(ChatError::Config("model must not be empty".to_string()));
        }

        if self.server.timeout_secs == 0 {
            return Err(ChatError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        model: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = url {
            self.server.url = url;
        }
        if let Some(model) = model {
            self.server.model = model;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.server.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }
}
