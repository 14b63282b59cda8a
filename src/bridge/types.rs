//! RPC request/response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::bridge::error::BridgeError;

pub const HEALTHY_MESSAGE: &str = "Service is healthy";
pub const UNHEALTHY_MESSAGE: &str = "Service is not responding";

/// An incoming RPC call: method name plus structured payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,

    /// A JSON object, `null`, or a string holding a JSON object.
    #[serde(default)]
    pub payload: Value,

    /// Extra headers forwarded to the downstream service.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,

    /// Caller deadline for the downstream call, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, payload: Value) -> Self {
        Self {
            method: method.into(),
            payload,
            ..Self::default()
        }
    }

    /// The payload as an object map.
    ///
    /// `null` and empty strings are an empty payload. A string is parsed as
    /// JSON text and must hold an object.
    pub fn payload_map(&self) -> Result<Map<String, Value>, BridgeError> {
        match &self.payload {
            Value::Null => Ok(Map::new()),
            Value::Object(map) => Ok(map.clone()),
            Value::String(text) if text.trim().is_empty() => Ok(Map::new()),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(BridgeError::InvalidPayload(format!(
                    "expected a JSON object, got {}",
                    json_type(&other)
                ))),
                Err(e) => Err(BridgeError::InvalidPayload(e.to_string())),
            },
            other => Err(BridgeError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_type(other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Uniform result of Execute and Compensate.
///
/// `error` is non-empty exactly when `success` is false.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResult {
    pub success: bool,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub error: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl RpcResult {
    pub fn ok(data: Map<String, Value>) -> Self {
        Self {
            success: true,
            data,
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "unknown error".to_string();
        }
        Self {
            success: false,
            error,
            ..Self::default()
        }
    }

    /// Collapse a pipeline outcome into the uniform shape.
    pub fn from_outcome(outcome: Result<Map<String, Value>, BridgeError>) -> Self {
        match outcome {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Result of a downstream liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub message: String,
    /// Unix epoch milliseconds at which the probe finished.
    #[serde(default)]
    pub checked_at_ms: u64,
}

impl HealthStatus {
    pub fn from_probe(healthy: bool) -> Self {
        let message = if healthy { HEALTHY_MESSAGE } else { UNHEALTHY_MESSAGE };
        Self {
            healthy,
            message: message.to_string(),
            checked_at_ms: now_millis(),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
