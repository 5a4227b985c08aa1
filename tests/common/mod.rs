//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::collections::VecDeque;

use chrono::Local;
use pool_monitor::upstream::{
    FetchError, FetchResult, LogEntry, MemberState, PoolMember, Resource, StateSource,
    VirtualServer,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen by the mock API.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    /// Lower-cased header names.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable mock management API on an ephemeral port.
pub async fn start_programmable_api<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = head_end + 4;
    while buf.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);
    let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

    Some(MockRequest {
        method,
        path,
        headers,
        body,
    })
}

pub fn login_ok(token: &str) -> (u16, String) {
    (200, json!({ "token": { "token": token } }).to_string())
}

pub fn member(pool: &str, name: &str, state: &str) -> PoolMember {
    PoolMember {
        pool: pool.into(),
        name: name.into(),
        address: format!("10.1.0.{}", name.len()),
        state: MemberState::from(state),
        session: "monitor-enabled".into(),
        connection_limit: 0,
    }
}

pub fn unreachable(resource: Resource) -> FetchError {
    FetchError::Timeout { resource, secs: 10 }
}

/// In-memory source replaying scripted member fetches.
///
/// Each call to `fetch_pool_members` pops the next scripted result; once the
/// script runs out the last result is repeated.
pub struct ScriptedSource {
    members: Mutex<VecDeque<FetchResult<Vec<PoolMember>>>>,
    last_members: Mutex<Vec<PoolMember>>,
    pub logs_fail: AtomicBool,
    pub virtuals: Vec<VirtualServer>,
    pub fetch_delay: std::time::Duration,
    pub virtuals_delay: std::time::Duration,
    pub member_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<FetchResult<Vec<PoolMember>>>) -> Self {
        Self {
            members: Mutex::new(script.into_iter().collect()),
            last_members: Mutex::new(Vec::new()),
            logs_fail: AtomicBool::new(false),
            virtuals: Vec::new(),
            fetch_delay: std::time::Duration::ZERO,
            virtuals_delay: std::time::Duration::ZERO,
            member_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.member_calls.load(Ordering::SeqCst)
    }
}

impl StateSource for ScriptedSource {
    fn fetch_pool_members(&self) -> impl Future<Output = FetchResult<Vec<PoolMember>>> + Send {
        async move {
            if !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
            self.member_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.members.lock().unwrap().pop_front();
            match next {
                Some(Ok(members)) => {
                    *self.last_members.lock().unwrap() = members.clone();
                    Ok(members)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self.last_members.lock().unwrap().clone()),
            }
        }
    }

    fn fetch_virtual_servers(
        &self,
    ) -> impl Future<Output = FetchResult<Vec<VirtualServer>>> + Send {
        async move {
            if !self.virtuals_delay.is_zero() {
                tokio::time::sleep(self.virtuals_delay).await;
            }
            Ok(self.virtuals.clone())
        }
    }

    fn fetch_logs(&self) -> impl Future<Output = FetchResult<Vec<LogEntry>>> + Send {
        async move {
            if self.logs_fail.load(Ordering::SeqCst) {
                return Err(unreachable(Resource::Logs));
            }
            Ok(vec![LogEntry(json!({ "at": Local::now().to_rfc3339() }))])
        }
    }
}
