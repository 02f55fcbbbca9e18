//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables (`EDIFLOW_CONFIG`, via the CLI)
//! - Command-line arguments

use crate::error::{Error, Result};
use ediflow_core::LinkOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable the payload is read from when no file is given
pub const DEFAULT_PAYLOAD_VAR: &str = "PALLET_JSON";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Payload input settings
    pub input: InputConfig,

    /// Related-record linking settings
    pub linking: LinkOptions,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Environment variable holding the payload
    pub payload_var: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            payload_var: DEFAULT_PAYLOAD_VAR.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config: Self = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Reject settings the commands cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.input.payload_var.is_empty() {
            return Err(Error::config("input.payload_var must not be empty"));
        }
        if self.linking.related_field.is_empty() {
            return Err(Error::config("linking.related_field must not be empty"));
        }
        if self.linking.page_limit == 0 {
            return Err(Error::config("linking.page_limit must be greater than zero"));
        }
        Ok(())
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".ediflow.yaml"),
            PathBuf::from(".ediflow.json"),
            PathBuf::from("ediflow.yaml"),
            PathBuf::from("ediflow.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let ediflow_dir = config_dir.join("ediflow");
            paths.push(ediflow_dir.join("config.yaml"));
            paths.push(ediflow_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".ediflow.yaml"));
            paths.push(home_dir.join(".ediflow.json"));
        }

        paths
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input.payload_var, "PALLET_JSON");
        assert_eq!(config.linking.related_field, "related_record");
        assert_eq!(config.linking.page_limit, 1000);
        assert!(config.output.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_partial() {
        let file = write_temp(
            ".yaml",
            "input:\n  payload_var: ASN_PALLETS\nlinking:\n  related_field: custbody_related_so\n",
        );
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.input.payload_var, "ASN_PALLETS");
        assert_eq!(config.linking.related_field, "custbody_related_so");
        assert_eq!(config.linking.page_limit, 1000);
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"logging": {"level": "debug", "format": "json"}}"#);
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_rejects_zero_page_limit() {
        let file = write_temp(".yaml", "linking:\n  page_limit: 0\n");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/ediflow.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
