use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::registry::RegistryOptions;
use crate::schema::SampleLimits;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// Upstream game-statistics API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_game_server_url")]
    pub game_server_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Session cookie value (loaded from environment, not from config file)
    #[serde(skip)]
    pub session_cookie: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            game_server_url: default_game_server_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            session_cookie: None,
        }
    }
}

fn default_api_url() -> String {
    "https://www.geoguessr.com/api".to_string()
}

fn default_game_server_url() -> String {
    "https://game-server.geoguessr.com/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "driftwatch/0.1.0".to_string()
}

/// Periodic monitoring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    /// Delay between requests within one sweep, to respect upstream
    /// rate limits.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_hours: default_interval_hours(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval_hours() -> u64 {
    24
}

fn default_request_delay_ms() -> u64 {
    500
}

/// Schema detection, retention, and truncation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaConfig {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_example_max_chars")]
    pub example_max_chars: usize,
    #[serde(default = "default_history_keep")]
    pub history_keep: usize,
    #[serde(default = "default_sample_max_keys")]
    pub sample_max_keys: usize,
    #[serde(default = "default_sample_max_items")]
    pub sample_max_items: usize,
    #[serde(default = "default_sample_max_chars")]
    pub sample_max_chars: usize,
    #[serde(default = "default_summary_max_fields")]
    pub summary_max_fields: usize,
}

impl SchemaConfig {
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            max_depth: self.max_depth,
            example_max_chars: self.example_max_chars,
            history_keep: self.history_keep,
            sample_limits: SampleLimits {
                max_keys: self.sample_max_keys,
                max_items: self.sample_max_items,
                max_chars: self.sample_max_chars,
            },
            summary_max_fields: self.summary_max_fields,
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            max_depth: default_max_depth(),
            example_max_chars: default_example_max_chars(),
            history_keep: default_history_keep(),
            sample_max_keys: default_sample_max_keys(),
            sample_max_items: default_sample_max_items(),
            sample_max_chars: default_sample_max_chars(),
            summary_max_fields: default_summary_max_fields(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/schemas")
}

fn default_max_depth() -> usize {
    5
}

fn default_example_max_chars() -> usize {
    100
}

fn default_history_keep() -> usize {
    10
}

fn default_sample_max_keys() -> usize {
    20
}

fn default_sample_max_items() -> usize {
    3
}

fn default_sample_max_chars() -> usize {
    200
}

fn default_summary_max_fields() -> usize {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.upstream.api_url, "https://www.geoguessr.com/api");
        assert_eq!(config.monitor.interval_hours, 24);
        assert_eq!(config.schema.max_depth, 5);
        assert_eq!(config.schema.history_keep, 10);
        assert!(config.upstream.session_cookie.is_none());
    }

    #[test]
    fn test_registry_options_from_schema_config() {
        let schema = SchemaConfig {
            max_depth: 3,
            sample_max_items: 7,
            ..SchemaConfig::default()
        };
        let options = schema.registry_options();
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.sample_limits.max_items, 7);
        assert_eq!(options.history_keep, 10);
    }
}
