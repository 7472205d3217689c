use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "DRIFTWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/driftwatch.toml";
const ENV_PREFIX: &str = "DRIFTWATCH";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config);
    Ok(config)
}

/// Load secrets from environment variables into config.
/// The session cookie is never stored in TOML files, only in environment.
fn load_secrets(config: &mut Config) {
    if let Ok(cookie) = env::var("DRIFTWATCH_SESSION_COOKIE") {
        config.upstream.session_cookie = Some(cookie);
    }

    // Alternative: the upstream service's own cookie variable name
    if config.upstream.session_cookie.is_none() {
        if let Ok(cookie) = env::var("GEOGUESSR_NCFA_COOKIE") {
            config.upstream.session_cookie = Some(cookie);
        }
    }
}

/// Load configuration from a specific path and environment.
/// Useful for testing with custom config files.
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // DRIFTWATCH__MONITOR__INTERVAL_HOURS -> monitor.interval_hours
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
