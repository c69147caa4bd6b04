//! Configuration file
//!
//! A single JSON object. Every key is optional:
//!
//! ```json
//! { "data_dir": "./data", "log_level": "warn", "log_format": "compact" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::Level;

use super::errors::{CliError, CliResult};
use super::logging::LogFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the contact log
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Minimum level written to stderr
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate a JSON config document
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        self.level()?;

        Ok(())
    }

    /// Parsed log level
    pub fn level(&self) -> CliResult<Level> {
        self.log_level.parse::<Level>().map_err(|_| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected one of trace, debug, info, warn, error.",
                self.log_level
            ))
        })
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.level().unwrap(), Level::WARN);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_json(
            r#"{"data_dir": "/tmp/contacts", "log_level": "debug", "log_format": "json"}"#,
        )
        .unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/contacts"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_json(r#"{"log_level": "loud"}"#).is_err());
        assert!(Config::from_json(r#"{"log_format": "xml"}"#).is_err());
        assert!(Config::from_json(r#"{"data_dir": ""}"#).is_err());
        assert!(Config::from_json(r#"{"page_size": 20}"#).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/contactdir.json")).unwrap_err();
        assert_eq!(err.code(), &super::super::errors::CliErrorCode::ConfigError);
    }
}
