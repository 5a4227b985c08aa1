//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, interval > 0)
//! - Check the management host is a bare authority, not a URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.host is required")]
    MissingHost,

    #[error("upstream.host '{0}' must be a host[:port], without scheme or path")]
    InvalidHost(String),

    #[error("upstream.username is required")]
    MissingUsername,

    #[error("upstream.password is required (set POOL_MONITOR_PASSWORD)")]
    MissingPassword,

    #[error("upstream.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("poller.interval_secs must be greater than 0")]
    ZeroInterval,

    #[error("observability.log_level '{0}' is not a known level")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let upstream = &config.upstream;

    if upstream.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    } else if !is_bare_authority(&upstream.host) {
        errors.push(ValidationError::InvalidHost(upstream.host.clone()));
    }

    if upstream.username.trim().is_empty() {
        errors.push(ValidationError::MissingUsername);
    }

    if upstream.password.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationError::MissingPassword);
    }

    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.poller.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_bare_authority(host: &str) -> bool {
    if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
        return false;
    }
    url::Url::parse(&format!("https://{}/", host))
        .map(|u| u.host_str().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> MonitorConfig {
        let mut config = MonitorConfig::default();
        config.upstream.host = "172.16.10.10".into();
        config.upstream.password = Some("secret".into());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_host_with_port_is_accepted() {
        let mut config = valid_config();
        config.upstream.host = "bigip.example.net:8443".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = MonitorConfig::default();
        config.upstream.timeout_secs = 0;
        config.poller.interval_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingHost));
        assert!(errors.contains(&ValidationError::MissingPassword));
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::ZeroInterval));
        assert!(errors.contains(&ValidationError::InvalidLogLevel("loud".into())));
    }

    #[test]
    fn test_rejects_url_as_host() {
        let mut config = valid_config();
        config.upstream.host = "https://10.0.0.1/mgmt".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidHost("https://10.0.0.1/mgmt".into())]);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidMetricsAddress("nowhere".into())]);
    }
}
