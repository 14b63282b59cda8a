//! RPC-to-HTTP translation subsystem.
//!
//! # Data Flow
//! ```text
//! Execute(method, payload)
//!     → service.rs (pipeline orchestration)
//!     → routing/ (endpoint, verb, bound path)
//!     → invoker.rs (one HTTP call with a deadline)
//!     → normalize.rs (status/body → data or error)
//!     → error.rs (Transport | Application | ResponseParse)
//!     → types.rs RpcResult { success, data, error }
//!
//! Compensate(method, payload)
//!     → compensation.rs (plan forward request; replay by default)
//!     → same pipeline as Execute
//! ```
//!
//! # Design Decisions
//! - Errors stay typed until the outermost boundary in service.rs
//! - No failure ever escapes as a panic or transport fault
//! - All shared state is immutable after construction

pub mod compensation;
pub mod error;
pub mod invoker;
pub mod normalize;
pub mod service;
pub mod types;

pub use compensation::{Compensation, ReplayCompensation};
pub use error::{BridgeError, BuildError, TransportError};
pub use invoker::{HttpInvoker, OutboundRequest, RawResponse};
pub use service::Bridge;
pub use types::{HealthStatus, RpcRequest, RpcResult};
