//! Outbound HTTP calls to the downstream service.
//!
//! # Responsibilities
//! - Join resolved paths onto the configured base URL
//! - Issue exactly one HTTP request per RPC call (no retries)
//! - Enforce the per-call deadline around send + body read
//! - Report connection-level failures as `TransportError`
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pooling, cheap to clone)
//! - Any HTTP status is a response here; status semantics live in normalize.rs

use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use crate::bridge::error::{BuildError, TransportError};
use crate::config::DownstreamConfig;
use crate::resilience::{with_deadline, DeadlineExceeded};
use crate::routing::binder::render_value;
use crate::routing::Verb;

/// A fully resolved downstream request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub verb: Verb,
    pub url: Url,
    /// JSON body, for POST/PUT.
    pub body: Option<Value>,
    /// Query parameters, for GET.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub deadline: Duration,
}

/// Status and body text of a downstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Issues requests against the downstream base URL.
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: Client,
    base_url: Url,
}

impl HttpInvoker {
    /// Create an invoker from downstream configuration.
    pub fn new(config: &DownstreamConfig) -> Result<Self, BuildError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| BuildError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The underlying client, shared with the health probe.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        join_url(&self.base_url, path)
    }

    /// Perform the request and read the whole body within the deadline.
    pub async fn invoke(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let url = request.url.to_string();

        let mut builder = self
            .client
            .request(request.verb.into(), request.url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(RawResponse { status, body })
        };

        match with_deadline(request.deadline, exchange).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(source)) => Err(TransportError::Request { url, source }),
            Err(DeadlineExceeded(timeout)) => Err(TransportError::Timeout { url, timeout }),
        }
    }
}

/// Join `path` onto `base`, keeping any path prefix already on the base.
pub fn join_url(base: &Url, path: &str) -> Result<Url, TransportError> {
    let joined = join_path(base, path);
    Url::parse(&joined).map_err(|source| TransportError::InvalidUrl {
        url: joined,
        source,
    })
}

/// Textual form of `base` followed by `path`.
pub fn join_path(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}

/// Flatten a payload into query parameters.
///
/// `null` values are skipped, arrays repeat the key once per element,
/// everything else is rendered like a path parameter.
pub fn query_pairs(payload: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push((key.clone(), render_value(item)));
                }
            }
            other => pairs.push((key.clone(), render_value(other))),
        }
    }
    pairs
}
