//! Error classification for the bridge pipeline.
//!
//! Every failure is one of:
//! - `Transport`: the downstream could not be reached or did not answer in time
//! - `Application`: the downstream answered with status >= 400
//! - `ResponseParse`: a successful status with a body that is not JSON
//! - `InvalidPayload`: the RPC payload itself is not an object
//!
//! They are only collapsed into `RpcResult` at the outer boundary.

use std::time::Duration;
use thiserror::Error;

/// The downstream call never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out after {}ms", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid downstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// A classified pipeline failure.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Displays the downstream body verbatim.
    #[error("{}", application_message(.status, .body))]
    Application { status: u16, body: String },

    #[error("failed to parse downstream response: {0}")]
    ResponseParse(#[source] serde_json::Error),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

fn application_message(status: &u16, body: &str) -> String {
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

impl BridgeError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Transport(TransportError::Timeout { .. }) => "timeout",
            BridgeError::Transport(_) => "transport",
            BridgeError::Application { .. } => "application",
            BridgeError::ResponseParse(_) => "parse",
            BridgeError::InvalidPayload(_) => "invalid_payload",
        }
    }
}

/// Errors constructing the bridge from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
