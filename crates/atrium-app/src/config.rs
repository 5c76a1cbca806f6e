//! Application configuration.
//!
//! Loaded from TOML; every field has a default so an empty document
//! (or no document at all) yields a working configuration:
//!
//! ```toml
//! [macros]
//! path = "~/.atrium/macros.json"
//!
//! [events]
//! default_timeout_ms = 30000
//! ```

use crate::error::AppError;
use atrium_event::DEFAULT_WAIT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtriumConfig {
    /// Macro persistence settings.
    pub macros: MacroStoreConfig,
    /// Event waiting settings.
    pub events: EventConfig,
}

impl AtriumConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for malformed TOML.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        toml::from_str(toml).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed
    /// file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let toml = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml)
    }
}

/// Where the macro table lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroStoreConfig {
    /// Path of the single JSON document holding all macros.
    pub path: PathBuf,
}

impl Default for MacroStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.atrium/macros.json"),
        }
    }
}

/// Event wait defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Timeout applied by `wait_for_event`, in milliseconds.
    /// `0` disables the timeout.
    pub default_timeout_ms: u64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = AtriumConfig::from_toml_str("").unwrap();
        assert_eq!(config, AtriumConfig::default());
        assert_eq!(config.events.default_timeout_ms, 30_000);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = AtriumConfig::from_toml_str(
            r#"
            [events]
            default_timeout_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.events.default_timeout_ms, 500);
        assert_eq!(config.macros, MacroStoreConfig::default());
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = AtriumConfig::from_toml_str("macros = 3").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let config = AtriumConfig::load("/nonexistent/atrium.toml").unwrap();
        assert_eq!(config, AtriumConfig::default());
    }
}
