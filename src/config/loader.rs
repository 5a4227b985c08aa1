//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::MonitorConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_HOST: &str = "POOL_MONITOR_HOST";
pub const ENV_USERNAME: &str = "POOL_MONITOR_USERNAME";
pub const ENV_PASSWORD: &str = "POOL_MONITOR_PASSWORD";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply overrides from a key lookup (the process environment in production).
///
/// Empty values are ignored so an exported-but-blank variable does not wipe a
/// configured value.
pub fn apply_env_overrides<F>(config: &mut MonitorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get(ENV_HOST) {
        config.upstream.host = host;
    }
    if let Some(username) = get(ENV_USERNAME) {
        config.upstream.username = username;
    }
    if let Some(password) = get(ENV_PASSWORD) {
        config.upstream.password = Some(password);
    }
}

/// Load configuration: optional TOML file, then environment overrides.
///
/// Validation is left to the caller so command-line overrides can be applied
/// first; see [`finalize`].
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => MonitorConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Validate a fully assembled configuration.
pub fn finalize(config: MonitorConfig) -> Result<MonitorConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
