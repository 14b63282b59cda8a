//! RPC-to-HTTP bridge library.
//!
//! Accepts generic RPC invocations (method name + structured payload),
//! translates each into a call against a resource-oriented HTTP API and
//! normalizes the response into a uniform `RpcResult`.

pub mod bridge;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use bridge::{Bridge, HealthStatus, RpcRequest, RpcResult};
pub use config::schema::BridgeConfig;
pub use http::RpcServer;
pub use lifecycle::Shutdown;
