//! Downstream health probing.
//!
//! # Data Flow
//! ```text
//! HealthCheck RPC
//!     → probe.rs (GET <base_url><health path>, bounded wait)
//!     → HealthStatus { healthy, message }
//! ```
//!
//! # Design Decisions
//! - Only an exact 200 counts as healthy
//! - Every failure kind (status, timeout, connection) collapses into one
//!   fixed message; details go to the log only
//! - Stateless: no thresholds, each probe stands alone

pub mod probe;

pub use probe::HealthProbe;
