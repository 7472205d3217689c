//! Configuration management for driftwatch
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `DRIFTWATCH__<section>__<key>`
//!
//! Examples:
//! - `DRIFTWATCH__MONITOR__INTERVAL_HOURS=6`
//! - `DRIFTWATCH__SCHEMA__CACHE_DIR=/var/lib/driftwatch/schemas`
//! - `DRIFTWATCH__UPSTREAM__REQUEST_TIMEOUT_SECS=10`
//!
//! The session cookie used for authenticated upstream requests is a secret
//! and is only read from the environment (`DRIFTWATCH_SESSION_COOKIE`),
//! never from the TOML file.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/driftwatch.toml`.
//! This can be overridden using the `DRIFTWATCH_CONFIG` environment variable.

mod models;
mod sources;

pub use models::{Config, MonitorConfig, SchemaConfig, UpstreamConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails (zero intervals, zero depth).
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.monitor.interval_hours == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.interval_hours must be at least 1".to_string(),
        ));
    }
    if config.schema.max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "schema.max_depth must be at least 1".to_string(),
        ));
    }
    if config.upstream.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "upstream.request_timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[monitor]
interval_hours = 12
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.monitor.interval_hours, 12);
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[monitor]\ninterval_hours = 0\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[schema]\nmax_depth = 0\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
