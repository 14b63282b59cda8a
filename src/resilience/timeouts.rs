//! Timeout enforcement.
//!
//! # Responsibilities
//! - Pick the deadline for a call (caller-supplied or configured default)
//! - Wrap outbound futures with that deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - A caller-supplied deadline of zero falls back to the default
//! - A caller-supplied deadline never exceeds the configured maximum

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time;

/// The wrapped future did not finish before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} exceeded")]
pub struct DeadlineExceeded(pub Duration);

/// Deadline for a call: the caller's `timeout_ms` if set, else `default`,
/// capped at `max` either way.
pub fn resolve_deadline(
    requested_ms: Option<u64>,
    default: Duration,
    max: Duration,
) -> Duration {
    let deadline = match requested_ms {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ => default,
    };
    deadline.min(max)
}

/// Run `fut` to completion or fail once `deadline` elapses.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, DeadlineExceeded>
where
    F: Future<Output = T>,
{
    time::timeout(deadline, fut)
        .await
        .map_err(|_| DeadlineExceeded(deadline))
}
