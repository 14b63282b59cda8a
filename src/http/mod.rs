//! RPC surface served over HTTP.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, worker permits)
//!     → request.rs (request ID generation and forwarding)
//!     → Bridge (execute / compensate / check_health)
//!     → JSON RpcResult / HealthStatus
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::RpcServer;
