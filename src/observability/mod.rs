//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Bridge pipeline and RPC server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows from the RPC caller to the downstream service
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
