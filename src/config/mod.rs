//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (host, username, password)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → sections handed to each subsystem by value
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Secrets come from the environment or the file, never from logs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::ConsoleConfig;
pub use schema::MonitorConfig;
pub use schema::ObservabilityConfig;
pub use schema::PollerConfig;
pub use schema::UpstreamConfig;
