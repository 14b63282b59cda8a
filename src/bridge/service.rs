//! The bridge pipeline.
//!
//! ```text
//! RpcRequest
//!     → EndpointRegistry::resolve     (template, verb)
//!     → binder::bind                  (path, remaining payload)
//!     → body placement                (JSON body | query | nothing)
//!     → HttpInvoker::invoke           (RawResponse | TransportError)
//!     → normalize                     (data | ApplicationError | ResponseParse)
//!     → RpcResult
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bridge::compensation::{Compensation, ReplayCompensation};
use crate::bridge::error::{BridgeError, BuildError};
use crate::bridge::invoker::{query_pairs, HttpInvoker, OutboundRequest};
use crate::bridge::normalize::normalize;
use crate::bridge::types::{HealthStatus, RpcRequest, RpcResult};
use crate::config::BridgeConfig;
use crate::health::HealthProbe;
use crate::observability::metrics;
use crate::resilience::resolve_deadline;
use crate::routing::{bind, BodyPlacement, EndpointRegistry};

/// Caller headers that are never forwarded.
const RESERVED_HEADERS: &[&str] = &[
    "host",
    "content-length",
    "content-type",
    "transfer-encoding",
    "connection",
];

/// Translates RPC calls into downstream HTTP calls.
///
/// Cheap to clone; all state is immutable and shared.
#[derive(Debug, Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

#[derive(Debug)]
struct BridgeInner {
    registry: EndpointRegistry,
    invoker: HttpInvoker,
    probe: HealthProbe,
    compensation: Box<dyn Compensation>,
    default_deadline: Duration,
    max_deadline: Duration,
    strip_bound_params: bool,
}

impl Bridge {
    /// Build a bridge with replay compensation.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BuildError> {
        Self::with_compensation(config, Box::new(ReplayCompensation))
    }

    /// Build a bridge with a custom compensation strategy.
    pub fn with_compensation(
        config: &BridgeConfig,
        compensation: Box<dyn Compensation>,
    ) -> Result<Self, BuildError> {
        let invoker = HttpInvoker::new(&config.downstream)?;
        let probe = HealthProbe::new(
            invoker.client().clone(),
            invoker.base_url(),
            &config.health_check,
        )?;

        tracing::info!(
            base_url = %invoker.base_url(),
            routes = config.routing.routes.len(),
            compensation = compensation.name(),
            "Bridge initialized"
        );

        Ok(Self {
            inner: Arc::new(BridgeInner {
                registry: EndpointRegistry::from_config(&config.routing),
                invoker,
                probe,
                compensation,
                default_deadline: config.downstream.request_timeout(),
                max_deadline: config.downstream.max_request_timeout(),
                strip_bound_params: config.routing.strip_bound_params,
            }),
        })
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.inner.registry
    }

    /// Forward invocation.
    pub async fn execute(&self, request: &RpcRequest) -> RpcResult {
        self.run("execute", request).await
    }

    /// Compensation: runs whatever forward request the strategy plans.
    pub async fn compensate(&self, request: &RpcRequest) -> RpcResult {
        let forward: Cow<'_, RpcRequest> = self.inner.compensation.plan(request);
        tracing::info!(
            method = %request.method,
            forward_method = %forward.method,
            strategy = self.inner.compensation.name(),
            "Compensating"
        );
        self.run("compensate", &forward).await
    }

    /// Probe the downstream service.
    pub async fn check_health(&self) -> HealthStatus {
        let status = self.inner.probe.check().await;
        metrics::record_health(status.healthy);
        status
    }

    /// Resolve a request into the exact downstream call, without sending it.
    pub fn prepare(&self, request: &RpcRequest) -> Result<OutboundRequest, BridgeError> {
        let payload = request.payload_map()?;
        let endpoint = self.inner.registry.resolve(&request.method);
        let bound = bind(&endpoint.template, &payload);

        if !bound.rejected.is_empty() {
            return Err(BridgeError::InvalidPayload(format!(
                "path parameters {:?} must not be '.' or '..'",
                bound.rejected
            )));
        }
        if !bound.unresolved.is_empty() {
            tracing::warn!(
                method = %request.method,
                template = %endpoint.template,
                unresolved = ?bound.unresolved,
                "Path placeholders left unresolved"
            );
        }

        let outgoing = if self.inner.strip_bound_params {
            bound.remaining
        } else {
            payload
        };

        let (body, query) = match endpoint.verb.body_placement() {
            BodyPlacement::Json => (Some(Value::Object(outgoing)), Vec::new()),
            BodyPlacement::Query => (None, query_pairs(&outgoing)),
            BodyPlacement::Omitted => (None, Vec::new()),
        };

        Ok(OutboundRequest {
            verb: endpoint.verb,
            url: self.inner.invoker.url_for(&bound.path)?,
            body,
            query,
            headers: forward_headers(request),
            deadline: resolve_deadline(
                request.timeout_ms,
                self.inner.default_deadline,
                self.inner.max_deadline,
            ),
        })
    }

    async fn run(&self, operation: &'static str, request: &RpcRequest) -> RpcResult {
        let start = Instant::now();
        let mut metadata = BTreeMap::new();
        let mut verb = "none";

        let outcome = match self.prepare(request) {
            Ok(outbound) => {
                verb = outbound.verb.as_str();
                metadata.insert("http_method".to_string(), verb.to_string());
                metadata.insert("path".to_string(), outbound.url.path().to_string());
                self.dispatch(outbound, &mut metadata).await
            }
            Err(e) => Err(e),
        };

        let elapsed = start.elapsed();

        let outcome_label = match &outcome {
            Ok(_) => {
                tracing::info!(
                    operation,
                    method = %request.method,
                    verb,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "RPC call succeeded"
                );
                "success"
            }
            Err(e) => {
                tracing::warn!(
                    operation,
                    method = %request.method,
                    verb,
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "RPC call failed"
                );
                e.kind()
            }
        };
        metrics::record_invocation(operation, verb, outcome_label, start);

        RpcResult::from_outcome(outcome).with_metadata(metadata)
    }

    async fn dispatch(
        &self,
        outbound: OutboundRequest,
        metadata: &mut BTreeMap<String, String>,
    ) -> Result<Map<String, Value>, BridgeError> {
        let raw = self.inner.invoker.invoke(outbound).await?;
        metadata.insert("http_status".to_string(), raw.status.to_string());
        normalize(raw)
    }
}

/// Headers sent downstream: caller headers plus correlation identifiers.
fn forward_headers(request: &RpcRequest) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in &request.headers {
        if RESERVED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
            continue;
        }
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid forwarded header"),
        }
    }

    let ids = [
        ("x-correlation-id", &request.correlation_id),
        ("x-workflow-id", &request.workflow_id),
        ("x-step-id", &request.step_id),
    ];
    for (name, value) in ids {
        if let Some(value) = value.as_deref().and_then(|v| HeaderValue::from_str(v).ok()) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }

    headers
}
