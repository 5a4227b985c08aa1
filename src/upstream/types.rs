//! Records returned by the management API and the errors around fetching them.
//!
//! Remote records are loosely typed. Every field is read leniently: a missing
//! or mistyped field is replaced by the sentinel documented on the struct
//! field, and the record is kept.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Placeholder for missing string fields.
pub const UNKNOWN: &str = "unknown";
/// Placeholder for a virtual server without a pool.
pub const NO_POOL: &str = "none";

/// Operational state of a pool member as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberState {
    Up,
    Down,
    /// Any other reported value (`user-down`, `unchecked`, ...) or `unknown`.
    Other(String),
}

impl MemberState {
    pub fn unknown() -> Self {
        MemberState::Other(UNKNOWN.to_string())
    }

    pub fn is_up(&self) -> bool {
        matches!(self, MemberState::Up)
    }

    pub fn is_down(&self) -> bool {
        matches!(self, MemberState::Down)
    }

    pub fn as_str(&self) -> &str {
        match self {
            MemberState::Up => "up",
            MemberState::Down => "down",
            MemberState::Other(s) => s,
        }
    }
}

impl From<&str> for MemberState {
    fn from(raw: &str) -> Self {
        match raw {
            "up" => MemberState::Up,
            "down" => MemberState::Down,
            other => MemberState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MemberState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diff key for a pool member: `pool/member`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(String);

impl StateKey {
    pub fn new(pool: &str, member: &str) -> Self {
        Self(format!("{}/{}", pool, member))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A backend server inside a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMember {
    /// Owning pool name.
    pub pool: String,
    /// Member name, usually `address:port` (sentinel `unknown`).
    pub name: String,
    /// Member address (sentinel `unknown`).
    pub address: String,
    /// Reported state (sentinel `unknown`).
    pub state: MemberState,
    /// Session mode, e.g. `monitor-enabled` (sentinel `unknown`).
    pub session: String,
    /// Connection limit, 0 meaning unlimited (sentinel `0`).
    pub connection_limit: u64,
}

impl PoolMember {
    /// Build a member from one raw `items[]` record of a pool's member list.
    pub fn from_record(pool: &str, record: &Value) -> Self {
        Self {
            pool: pool.to_string(),
            name: str_field(record, "name", UNKNOWN),
            address: str_field(record, "address", UNKNOWN),
            state: record
                .get("state")
                .and_then(Value::as_str)
                .map(MemberState::from)
                .unwrap_or_else(MemberState::unknown),
            session: str_field(record, "session", UNKNOWN),
            connection_limit: record
                .get("connectionLimit")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        }
    }

    pub fn key(&self) -> StateKey {
        StateKey::new(&self.pool, &self.name)
    }
}

/// A published `address:port` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualServer {
    pub name: String,
    /// Destination, e.g. `/Common/10.0.0.10:443` (sentinel `unknown`).
    pub destination: String,
    /// Sentinel `false`.
    pub enabled: bool,
    /// Default pool (sentinel `none`).
    pub pool: String,
}

impl VirtualServer {
    pub fn from_record(record: &Value) -> Self {
        Self {
            name: str_field(record, "name", UNKNOWN),
            destination: str_field(record, "destination", UNKNOWN),
            enabled: record.get("enabled").and_then(Value::as_bool).unwrap_or(false),
            pool: str_field(record, "pool", NO_POOL),
        }
    }
}

/// One raw record from the system log endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry(pub Value);

/// Pool names listed by the pool collection endpoint.
pub fn pool_names(body: &Value) -> Vec<String> {
    items(body)
        .iter()
        .map(|record| str_field(record, "name", UNKNOWN))
        .collect()
}

/// The `items` array of a collection response; empty when absent.
pub fn items(body: &Value) -> &[Value] {
    body.get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Log records from a `sys/log` response.
///
/// `entries` is either an array of records or an object keyed by self-link;
/// both shapes are flattened into a list.
pub fn log_entries(body: &Value) -> Vec<LogEntry> {
    match body.get("entries") {
        Some(Value::Array(list)) => list.iter().cloned().map(LogEntry).collect(),
        Some(Value::Object(map)) => map.values().cloned().map(LogEntry).collect(),
        _ => Vec::new(),
    }
}

fn str_field(record: &Value, field: &str, fallback: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

/// Which upstream collection a request was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Pools,
    PoolMembers(String),
    VirtualServers,
    Logs,
}

impl Resource {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Pools => "pools",
            Resource::PoolMembers(_) => "pool_members",
            Resource::VirtualServers => "virtual_servers",
            Resource::Logs => "logs",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Pools => f.write_str("pools"),
            Resource::PoolMembers(pool) => write!(f, "members of pool '{}'", pool),
            Resource::VirtualServers => f.write_str("virtual servers"),
            Resource::Logs => f.write_str("system logs"),
        }
    }
}

/// A failed fetch of one upstream collection.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{resource}: request failed: {source}")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource}: upstream returned HTTP {status}")]
    Status {
        resource: Resource,
        status: reqwest::StatusCode,
    },

    #[error("{resource}: invalid response body: {reason}")]
    Decode { resource: Resource, reason: String },

    #[error("{resource}: timed out after {secs} seconds")]
    Timeout { resource: Resource, secs: u64 },
}

impl FetchError {
    pub fn resource(&self) -> &Resource {
        match self {
            FetchError::Transport { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::Decode { resource, .. }
            | FetchError::Timeout { resource, .. } => resource,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure to obtain an auth token. Terminal: nothing works without one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no password configured for user '{0}'")]
    MissingCredentials(String),

    #[error("invalid management host '{0}'")]
    InvalidHost(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("login request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("login rejected with HTTP {0}")]
    Rejected(reqwest::StatusCode),

    #[error("login response did not contain a token")]
    MissingToken,

    #[error("login timed out after {0} seconds")]
    Timeout(u64),
}
