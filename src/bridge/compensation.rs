//! Compensation strategies.
//!
//! A strategy decides which forward request runs when a caller asks to
//! compensate a request. The forward pipeline itself is untouched, so an
//! inverse-operation mapping can replace [`ReplayCompensation`] without
//! changing how requests are routed or invoked.

use std::borrow::Cow;
use std::fmt::Debug;

use crate::bridge::types::RpcRequest;

/// Maps a compensation request onto the forward request to execute.
pub trait Compensation: Send + Sync + Debug {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// The request to run through the forward pipeline.
    fn plan<'a>(&self, request: &'a RpcRequest) -> Cow<'a, RpcRequest>;
}

/// Compensates by replaying the original request unchanged.
///
/// No inverse routing, no check that the forward call succeeded, and no
/// idempotency guard.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayCompensation;

impl Compensation for ReplayCompensation {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn plan<'a>(&self, request: &'a RpcRequest) -> Cow<'a, RpcRequest> {
        Cow::Borrowed(request)
    }
}
