//! RPC server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the Execute / Compensate / HealthCheck handlers
//! - Wire up middleware (request ID, tracing, body limit)
//! - Bound concurrent Execute / Compensate calls with a worker semaphore
//! - Keep HealthCheck outside the pool so its latency is only the probe timeout
//! - Serve until the shutdown signal fires, then drain
//!
//! # Routes
//! ```text
//! POST /rpc/execute      RpcRequest → RpcResult
//! POST /rpc/compensate   RpcRequest → RpcResult
//! GET  /rpc/health       → HealthStatus
//! ```

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::bridge::{Bridge, HealthStatus, RpcRequest, RpcResult};
use crate::config::BridgeConfig;
use crate::http::request::{attach_request_id, request_id, UuidRequestId};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Bridge,
    /// One permit per in-flight Execute / Compensate call.
    pub workers: Arc<Semaphore>,
}

/// Serves the bridge over HTTP/JSON.
pub struct RpcServer {
    router: Router,
    config: BridgeConfig,
}

impl RpcServer {
    /// Create a new server around an already-built bridge.
    pub fn new(config: BridgeConfig, bridge: Bridge) -> Self {
        let state = AppState {
            bridge,
            workers: Arc::new(Semaphore::new(config.listener.max_concurrency)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BridgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/rpc/execute", post(execute_handler))
            .route("/rpc/compensate", post(compensate_handler))
            .route("/rpc/health", get(health_handler).post(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes)),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_concurrency = self.config.listener.max_concurrency,
            downstream = %self.config.downstream.base_url,
            "RPC server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("RPC server received shutdown signal, draining");
            })
            .await?;

        tracing::info!("RPC server stopped");
        Ok(())
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

async fn execute_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<RpcRequest>,
) -> Json<RpcResult> {
    let Ok(_permit) = state.workers.acquire().await else {
        return Json(RpcResult::failure("worker pool closed"));
    };

    attach_request_id(&headers, &mut request);
    tracing::debug!(
        request_id = request_id(&headers).unwrap_or("unknown"),
        method = %request.method,
        "Execute"
    );

    Json(state.bridge.execute(&request).await)
}

async fn compensate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<RpcRequest>,
) -> Json<RpcResult> {
    let Ok(_permit) = state.workers.acquire().await else {
        return Json(RpcResult::failure("worker pool closed"));
    };

    attach_request_id(&headers, &mut request);
    tracing::debug!(
        request_id = request_id(&headers).unwrap_or("unknown"),
        method = %request.method,
        "Compensate"
    );

    Json(state.bridge.compensate(&request).await)
}

/// Never queues behind the worker pool; the probe bounds its own wait.
async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.bridge.check_health().await)
}
