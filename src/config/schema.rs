//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the pool monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Management API connection settings.
    pub upstream: UpstreamConfig,

    /// Background poll loop settings.
    pub poller: PollerConfig,

    /// Interactive console settings.
    pub console: ConsoleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Management API connection settings.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Management host (e.g., "172.16.10.10" or "bigip.example.net:8443").
    pub host: String,

    /// Login user.
    pub username: String,

    /// Login password. Prefer `POOL_MONITOR_PASSWORD` over the config file.
    pub password: Option<String>,

    /// Login provider sent with the token request.
    pub login_provider: String,

    /// Per-call timeout in seconds (login and every fetch).
    pub timeout_secs: u64,

    /// Skip certificate verification for the management interface.
    pub accept_invalid_certs: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: "admin".to_string(),
            password: None,
            login_provider: "tmos".to_string(),
            timeout_secs: 10,
            // Management interfaces ship with self-signed certificates.
            accept_invalid_certs: true,
        }
    }
}

// Never print the password.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("login_provider", &self.login_provider)
            .field("timeout_secs", &self.timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Seconds between poll cycles.
    pub interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

/// Console configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Prompt printed before each command.
    pub prompt: String,

    /// How long to wait for the poller to finish its cycle on exit.
    pub shutdown_grace_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            shutdown_grace_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [upstream]
            host = "10.0.0.1"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.host, "10.0.0.1");
        assert_eq!(config.upstream.username, "admin");
        assert_eq!(config.upstream.login_provider, "tmos");
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.poller.interval_secs, 30);
        assert_eq!(config.console.prompt, "> ");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_debug_redacts_password() {
        let upstream = UpstreamConfig {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        let rendered = format!("{:?}", upstream);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
