//! Configuration parsing, validation, and credential loading.
//!
//! Settings come from a TOML file. The text-generation API key is never
//! read from the file; it is taken from the environment variable named by
//! `suggestions.api_key_env`.

use crate::task::ports::{DurableSlotError, SlotKey};
use crate::telemetry::LogFormat;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

fn default_slot_key() -> String {
    SlotKey::DEFAULT.to_owned()
}

fn default_endpoint() -> String {
    crate::task::adapters::gemini::DEFAULT_ENDPOINT.to_owned()
}

fn default_model() -> String {
    crate::task::adapters::gemini::DEFAULT_MODEL.to_owned()
}

const fn default_timeout_seconds() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_owned()
}

/// Where the task list is persisted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Directory holding the durable slot files.
    pub directory: Utf8PathBuf,
    /// Slot key for the task list.
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
}

/// Text-generation endpoint settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SuggestionConfig {
    /// Base URL of the generation API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model name inserted into the request path.
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound for one suggestion call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// API key (populated at runtime).
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Output format for log lines.
    #[serde(default)]
    pub format: LogFormat,
}

/// Configuration parsed from `taskdeck.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TaskDeckConfig {
    /// Storage settings.
    pub storage: StorageConfig,
    /// Suggestion endpoint settings.
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The slot key is unusable.
    #[error(transparent)]
    SlotKey(#[from] DurableSlotError),

    /// The suggestion timeout is zero.
    #[error("suggestions.timeout_seconds must be greater than zero")]
    ZeroTimeout,
}

impl TaskDeckConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, and the
    /// errors of [`TaskDeckConfig::from_toml_str`].
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |err: std::io::Error| ConfigError::Read {
            path: path.to_owned(),
            source: Arc::new(err),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| read_error(std::io::Error::other("path must include a file name")))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let raw = dir.read_to_string(file_name).map_err(read_error)?;
        Self::from_toml_str(&raw)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML,
    /// [`ConfigError::SlotKey`] for an invalid slot key, and
    /// [`ConfigError::ZeroTimeout`] for a zero timeout.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.slot_key()?;
        if self.suggestions.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Returns the validated slot key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SlotKey`] when the key is invalid.
    pub fn slot_key(&self) -> Result<SlotKey, ConfigError> {
        Ok(SlotKey::new(self.storage.slot_key.clone())?)
    }

    /// Returns the suggestion call timeout.
    #[must_use]
    pub const fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestions.timeout_seconds)
    }

    /// Reads the API key from the configured environment variable.
    ///
    /// A missing or empty variable leaves the key unset; suggestion calls
    /// then fail as unavailable instead of failing startup.
    pub fn load_api_key(&mut self) {
        match env::var(&self.suggestions.api_key_env) {
            Ok(value) if !value.trim().is_empty() => {
                self.suggestions.api_key = Some(value.trim().to_owned());
            }
            _ => {
                warn!(
                    variable = %self.suggestions.api_key_env,
                    "API key not set, subtask suggestions will be unavailable"
                );
                self.suggestions.api_key = None;
            }
        }
    }
}
