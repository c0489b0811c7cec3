//! Configuration: a small serde struct loaded from an explicit path or the
//! user config directory, falling back to defaults field by field.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::services::oracle::{API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_MODEL_ID};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Model identifier sent to the generateContent endpoint.
    pub model_id: String,
    /// API base URL; overridable for testing against a local mock.
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Theme name ("dark" or "light").
    pub theme: String,
    /// Language selected at startup.
    pub default_language: String,
    /// Per-request timeout for oracle calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key_env: API_KEY_ENV.to_string(),
            theme: "dark".to_string(),
            default_language: "javascript".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Path of the user config file, if a config directory exists.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aether").join("config.json"))
    }

    /// Load from `explicit` if given (errors are fatal there — the user
    /// asked for that exact file), else from the user config file if
    /// present (parse failures log a warning and fall back), else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        if let Some(path) = Self::user_config_path() {
            if path.is_file() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Ignoring unreadable user config: {e:#}");
                    }
                }
            }
        }
        Ok(Self::default())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
