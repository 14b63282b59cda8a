//! Response normalization.
//!
//! # Rules
//! ```text
//! status >= 400          → Application error, message = raw body text
//! empty / blank body     → {}
//! JSON object body       → data
//! other JSON body        → {"value": <json>}
//! unparsable body        → ResponseParse error
//! ```

use serde_json::{Map, Value};

use crate::bridge::error::BridgeError;
use crate::bridge::invoker::RawResponse;

/// Key used to wrap non-object JSON bodies.
pub const VALUE_KEY: &str = "value";

/// Turn a downstream response into result data or a classified error.
pub fn normalize(raw: RawResponse) -> Result<Map<String, Value>, BridgeError> {
    if raw.status >= 400 {
        return Err(BridgeError::Application {
            status: raw.status,
            body: raw.body,
        });
    }
    parse_body(&raw.body)
}

/// Parse a successful response body into a mapping.
pub fn parse_body(body: &str) -> Result<Map<String, Value>, BridgeError> {
    if body.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(body).map_err(BridgeError::ResponseParse)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = Map::new();
            map.insert(VALUE_KEY.to_string(), other);
            Ok(map)
        }
    }
}
