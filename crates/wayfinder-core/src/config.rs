//! Runtime configuration for the model client and the session.
//!
//! Settings come from an optional JSON file, by default
//! `$XDG_CONFIG_HOME/wayfinder/config.json`. Every field is optional:
//!
//! ```json
//! {
//!   "model": "gemini-2.5-flash",
//!   "base_url": "https://generativelanguage.googleapis.com",
//!   "timeout_secs": 60,
//!   "max_retries": 3,
//!   "language": "en"
//! }
//! ```
//!
//! The API key is never read from the file; it comes from
//! `WAYFINDER_API_KEY` or `GEMINI_API_KEY`.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AssistantError, Result},
    models::Language,
};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Upper bound for `max_retries`; backoff doubles per attempt.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["WAYFINDER_API_KEY", "GEMINI_API_KEY"];

/// Resolved settings for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Initial output language
    pub language: Language,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            language: Language::default(),
        }
    }
}

impl AssistantConfig {
    /// Read a config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| AssistantError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AssistantConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path`, or at the default location if it exists,
    /// or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// The default config file, if one exists.
    pub fn default_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("wayfinder").find_config_file("config.json")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AssistantError::invalid_input("model").with_reason("Model name cannot be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AssistantError::invalid_input("base_url")
                .with_reason(format!("'{}' is not an http(s) URL", self.base_url)));
        }
        if self.timeout_secs == 0 {
            return Err(AssistantError::invalid_input("timeout_secs").with_reason("Timeout must be positive"));
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(AssistantError::invalid_input("max_retries")
                .with_reason(format!("At most {MAX_RETRIES_LIMIT} retries are allowed, got {}", self.max_retries)));
        }
        Ok(())
    }
}

/// The API key from the environment, if set and non-empty.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{"model": "gemini-2.5-pro", "language": "zh"}"#);
        let config = AssistantConfig::from_file(file.path()).unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.language, Language::Chinese);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssistantConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, AssistantError::FileSystem { .. }));
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let file = write_config("{ not json");
        let err = AssistantConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AssistantError::Serialization { .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config(r#"{"base_url": "ftp://example.com"}"#);
        let err = AssistantConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput { ref field, .. } if field == "base_url"));

        let file = write_config(r#"{"timeout_secs": 0}"#);
        assert!(AssistantConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_max_retries_is_capped() {
        let file = write_config(&format!(r#"{{"max_retries": {MAX_RETRIES_LIMIT}}}"#));
        let config = AssistantConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_retries, MAX_RETRIES_LIMIT);

        let file = write_config(r#"{"max_retries": 40}"#);
        let err = AssistantConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput { ref field, .. } if field == "max_retries"));
    }
}
