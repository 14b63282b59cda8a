//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use rpc_bridge::config::BridgeConfig;

/// A request observed by the mock downstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Captured {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("downstream body is not JSON")
    }
}

/// Handle to a running mock downstream service.
pub struct MockDownstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockDownstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.requests().pop().expect("downstream saw no requests")
    }
}

/// Start a mock downstream that answers every request with `respond`.
pub async fn start_downstream<F>(respond: F) -> MockDownstream
where
    F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
{
    start_slow_downstream(Duration::ZERO, respond).await
}

/// Like `start_downstream`, but every response is delayed by `delay`.
pub async fn start_slow_downstream<F>(delay: Duration, respond: F) -> MockDownstream
where
    F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
{
    let captured = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let sink = captured.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let sink = sink.clone();
            let respond = respond.clone();
            async move {
                let request = Captured {
                    method,
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    headers,
                    body: String::from_utf8_lossy(&body).into_owned(),
                };
                let (status, body) = (*respond)(&request);
                sink.lock().unwrap().push(request);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                (StatusCode::from_u16(status).unwrap(), body)
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockDownstream { addr, captured }
}

/// Start a server that accepts connections and never answers.
pub async fn start_hanging_downstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// An address with nothing listening on it.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Default configuration pointed at `base_url`.
pub fn config_for(base_url: &str) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.downstream.base_url = base_url.to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config
}
