//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration for the RPC bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// RPC listener configuration (bind address, worker pool).
    pub listener: ListenerConfig,

    /// The wrapped HTTP service.
    pub downstream: DownstreamConfig,

    /// Health probe settings.
    pub health_check: HealthCheckConfig,

    /// Method → endpoint routing table.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:50051").
    pub bind_address: String,

    /// Maximum RPC calls serviced concurrently; extra calls wait.
    pub max_concurrency: usize,

    /// Maximum accepted RPC request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:50051".to_string(),
            max_concurrency: 10,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Downstream HTTP service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Base URL every resolved path is appended to.
    pub base_url: String,

    /// Default deadline for Execute/Compensate calls in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound on a caller-supplied `timeout_ms`, in seconds.
    pub max_request_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent sent downstream.
    pub user_agent: String,
}

impl DownstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_request_timeout(&self) -> Duration {
        Duration::from_secs(self.max_request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            max_request_timeout_secs: 120,
            connect_timeout_secs: 5,
            user_agent: concat!("rpc-bridge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Path probed on the downstream service.
    pub path: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,
}

impl HealthCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Routing table configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Exact method name → path template.
    pub routes: BTreeMap<String, String>,

    /// Prefix for unmapped methods: `<prefix><lowercase(method)>`.
    pub fallback_prefix: String,

    /// Drop payload keys consumed by path placeholders from body/query.
    pub strip_bound_params: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let routes = [
            ("CreateUser", "/api/users"),
            ("DeleteUser", "/api/users/{user_id}"),
            ("GetUser", "/api/users/{user_id}"),
            ("UpdateUser", "/api/users/{user_id}"),
        ]
        .into_iter()
        .map(|(method, template)| (method.to_string(), template.to_string()))
        .collect();

        Self {
            routes,
            fallback_prefix: "/api/".to_string(),
            strip_bound_params: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
