//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call to downstream:
//!     → timeouts.rs (resolve deadline, enforce it)
//!     → On expiry: TransportError::Timeout
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: Execute/Compensate calls are not assumed idempotent

pub mod timeouts;

pub use timeouts::{resolve_deadline, with_deadline, DeadlineExceeded};
