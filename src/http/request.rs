//! Request identification.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID for calls that arrive without one
//! - Copy the ID onto the RPC request so it is forwarded downstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A caller-supplied `x-request-id` is kept as-is

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::bridge::RpcRequest;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Makes `x-request-id` values from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The inbound request ID, if any.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

/// Forward the inbound request ID unless the caller set one explicitly.
pub fn attach_request_id(headers: &HeaderMap, request: &mut RpcRequest) {
    let Some(id) = request_id(headers) else {
        return;
    };
    let already_set = request
        .headers
        .keys()
        .any(|name| name.eq_ignore_ascii_case(X_REQUEST_ID));
    if !already_set {
        request.headers.insert(X_REQUEST_ID.to_string(), id.to_string());
    }
}
