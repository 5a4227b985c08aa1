//! Authenticated management API client with per-call timeouts.
//!
//! # Responsibilities
//! - Exchange username/password for an auth token
//! - Fetch pools (two-level), virtual servers and system logs
//! - Bound every request with the configured timeout
//! - Degrade to a partial member list when single pools fail

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use tokio::time::timeout;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{
    items, log_entries, pool_names, AuthError, FetchError, FetchResult, LogEntry, PoolMember,
    Resource, VirtualServer,
};
use crate::upstream::StateSource;

/// Header carrying the session token on every call after login.
pub const AUTH_TOKEN_HEADER: &str = "x-f5-auth-token";

/// Management API client holding an authenticated session.
#[derive(Clone)]
pub struct ManagementClient {
    http: reqwest::Client,
    base: Url,
    timeout_duration: Duration,
}

impl ManagementClient {
    /// Log in to `https://<host>` and return an authenticated client.
    pub async fn connect(config: &UpstreamConfig) -> Result<Self, AuthError> {
        let base = Url::parse(&format!("https://{}/", config.host))
            .map_err(|_| AuthError::InvalidHost(config.host.clone()))?;
        Self::connect_to(base, config).await
    }

    /// Log in against an explicit base URL (scheme, host and port).
    pub async fn connect_to(base: Url, config: &UpstreamConfig) -> Result<Self, AuthError> {
        let password = config
            .password
            .as_deref()
            .ok_or_else(|| AuthError::MissingCredentials(config.username.clone()))?;
        let timeout_duration = Duration::from_secs(config.timeout_secs);

        let login_client = Self::builder(config, HeaderMap::new())
            .build()
            .map_err(AuthError::Client)?;

        let login_url = endpoint(&base, &["mgmt", "shared", "authn", "login"]);
        let payload = json!({
            "username": config.username,
            "password": password,
            "loginProviderName": config.login_provider,
        });

        let login = async {
            let response = login_client
                .post(login_url)
                .json(&payload)
                .send()
                .await
                .map_err(AuthError::Transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(AuthError::Rejected(status));
            }

            let body: Value = response.json().await.map_err(AuthError::Transport)?;
            body.get("token")
                .and_then(|t| t.get("token"))
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .ok_or(AuthError::MissingToken)
        };

        let token = match timeout(timeout_duration, login).await {
            Ok(result) => result?,
            Err(_) => return Err(AuthError::Timeout(config.timeout_secs)),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTH_TOKEN_HEADER,
            HeaderValue::from_str(&token).map_err(|_| AuthError::MissingToken)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Self::builder(config, headers)
            .build()
            .map_err(AuthError::Client)?;

        tracing::info!(
            base = %base,
            username = %config.username,
            "Authentication successful"
        );

        Ok(Self {
            http,
            base,
            timeout_duration,
        })
    }

    fn builder(config: &UpstreamConfig, headers: HeaderMap) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
    }

    async fn get_json(&self, resource: Resource, url: Url) -> FetchResult<Value> {
        let request = async {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    resource: resource.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    resource: resource.clone(),
                    status,
                });
            }

            let text = response.text().await.map_err(|source| FetchError::Transport {
                resource: resource.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|e| FetchError::Decode {
                resource: resource.clone(),
                reason: e.to_string(),
            })
        };

        match timeout(self.timeout_duration, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                resource: resource.clone(),
                secs: self.timeout_duration.as_secs(),
            }),
        }
    }

    async fn members_of(&self, pool: &str) -> FetchResult<Vec<PoolMember>> {
        let url = endpoint(&self.base, &["mgmt", "tm", "ltm", "pool", pool, "members"]);
        let body = self
            .get_json(Resource::PoolMembers(pool.to_string()), url)
            .await?;
        Ok(items(&body)
            .iter()
            .map(|record| PoolMember::from_record(pool, record))
            .collect())
    }
}

impl std::fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementClient")
            .field("base", &self.base.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

impl StateSource for ManagementClient {
    fn fetch_pool_members(&self) -> impl Future<Output = FetchResult<Vec<PoolMember>>> + Send {
        async move {
            let url = endpoint(&self.base, &["mgmt", "tm", "ltm", "pool"]);
            let body = self.get_json(Resource::Pools, url).await?;

            let mut members = Vec::new();
            for pool in pool_names(&body) {
                match self.members_of(&pool).await {
                    Ok(found) => members.extend(found),
                    Err(e) => {
                        // One pool failing leaves the rest of the list usable.
                        metrics::record_fetch_failure(e.resource());
                        tracing::warn!(pool = %pool, error = %e, "Skipping pool after member fetch failed");
                    }
                }
            }
            Ok(members)
        }
    }

    fn fetch_virtual_servers(
        &self,
    ) -> impl Future<Output = FetchResult<Vec<VirtualServer>>> + Send {
        async move {
            let url = endpoint(&self.base, &["mgmt", "tm", "ltm", "virtual"]);
            let body = self.get_json(Resource::VirtualServers, url).await?;
            Ok(items(&body).iter().map(VirtualServer::from_record).collect())
        }
    }

    fn fetch_logs(&self) -> impl Future<Output = FetchResult<Vec<LogEntry>>> + Send {
        async move {
            let url = endpoint(&self.base, &["mgmt", "tm", "sys", "log"]);
            let body = self.get_json(Resource::Logs, url).await?;
            Ok(log_entries(&body))
        }
    }
}

/// Join path segments onto the base URL, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url
}
