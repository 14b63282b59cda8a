//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! RPC method + payload
//!     → registry.rs (method → template, verb)
//!     → verb.rs (verb + body placement from method prefix)
//!     → binder.rs (substitute {placeholders} from payload)
//!     → Return: resolved path + remaining payload
//!
//! Registry construction (at startup):
//!     RoutingConfig.routes
//!     → Freeze as immutable EndpointRegistry
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact-match lookup, no patterns over method names
//! - Deterministic: same method and payload always yield the same path

pub mod binder;
pub mod registry;
pub mod verb;

pub use binder::{bind, BoundPath};
pub use registry::{EndpointRegistry, EndpointSpec};
pub use verb::{BodyPlacement, Verb};
