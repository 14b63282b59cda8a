//! HTTP verb inference from RPC method names.
//!
//! # Rules
//! Evaluated by prefix, case-sensitive, first match wins:
//! ```text
//! Create*  → POST    payload as JSON body
//! Delete*  → DELETE  no body
//! Update*  → PUT     payload as JSON body
//! *        → GET     payload as query parameters
//! ```
//!
//! # Design Decisions
//! - The verb is always derived from the method name, never stored per route
//! - Matching is case-sensitive: `createUser` is a GET

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verb used against the downstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// Where the payload goes on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPlacement {
    /// Serialized as a JSON request body.
    Json,
    /// Flattened into query-string parameters.
    Query,
    /// Not sent at all.
    Omitted,
}

impl Verb {
    /// Infer the verb for an RPC method name.
    pub fn infer(method: &str) -> Self {
        if method.starts_with("Create") {
            Verb::Post
        } else if method.starts_with("Delete") {
            Verb::Delete
        } else if method.starts_with("Update") {
            Verb::Put
        } else {
            Verb::Get
        }
    }

    pub fn body_placement(self) -> BodyPlacement {
        match self {
            Verb::Post | Verb::Put => BodyPlacement::Json,
            Verb::Get => BodyPlacement::Query,
            Verb::Delete => BodyPlacement::Omitted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for reqwest::Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }
}
