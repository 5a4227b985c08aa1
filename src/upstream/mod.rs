//! Upstream management API subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig (host, credentials, timeout)
//!     → client.rs (login, token header, timed GETs)
//!     → types.rs (lenient record parsing with sentinels)
//!     → StateSource (what the poller and console depend on)
//! ```
//!
//! # Design Decisions
//! - Authentication happens once at startup; failure is terminal
//! - Every request has its own timeout, no retries
//! - A failing pool degrades the member list instead of failing it

use std::future::Future;

pub mod client;
pub mod types;

pub use client::ManagementClient;
pub use types::{
    AuthError, FetchError, FetchResult, LogEntry, MemberState, PoolMember, Resource, StateKey,
    VirtualServer,
};

/// Read-only view of the load balancer's current state.
pub trait StateSource: Send + Sync + 'static {
    /// All members of all pools. Per-pool failures yield a partial list.
    fn fetch_pool_members(&self) -> impl Future<Output = FetchResult<Vec<PoolMember>>> + Send;

    fn fetch_virtual_servers(&self)
        -> impl Future<Output = FetchResult<Vec<VirtualServer>>> + Send;

    fn fetch_logs(&self) -> impl Future<Output = FetchResult<Vec<LogEntry>>> + Send;
}
