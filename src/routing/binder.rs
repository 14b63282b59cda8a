//! Path parameter binding.
//!
//! # Responsibilities
//! - Substitute `{name}` placeholders in a template with payload values
//! - Report which payload keys were consumed and which placeholders were not
//!
//! # Design Decisions
//! - Single left-to-right scan of the template: substituted values are never
//!   re-scanned, so the result does not depend on payload key order
//! - Placeholders without a matching key stay in the path verbatim
//! - Strings use their raw text, every other value its JSON text; either way
//!   the text is percent-encoded as exactly one path segment
//! - `.` and `..` are never substituted: URL parsing would collapse them

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use url::form_urlencoded;

/// Outcome of binding a payload into a template.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundPath {
    /// Template with every resolvable placeholder substituted.
    pub path: String,
    /// Payload entries that were not consumed by a placeholder.
    pub remaining: Map<String, Value>,
    /// Placeholder names left unresolved in `path`, in template order.
    pub unresolved: Vec<String>,
    /// Placeholders whose value would be a dot segment; left literal in `path`.
    pub rejected: Vec<String>,
}

/// Bind `payload` into `template`.
pub fn bind(template: &str, payload: &Map<String, Value>) -> BoundPath {
    let mut path = String::with_capacity(template.len());
    let mut used = BTreeSet::new();
    let mut unresolved = Vec::new();
    let mut rejected = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            // Unterminated placeholder: keep the tail as-is.
            path.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let name = &after[..close];
        if name.contains('{') {
            // `{{name}`: the first brace is literal.
            path.push('{');
            rest = after;
            continue;
        }

        let segment = match payload.get(name) {
            Some(value) if !name.is_empty() => encode_segment(&render_value(value)),
            _ => None,
        };
        match segment {
            Some(segment) => {
                path.push_str(&segment);
                used.insert(name);
            }
            None => {
                path.push('{');
                path.push_str(name);
                path.push('}');
                match (name.is_empty(), payload.contains_key(name)) {
                    (true, _) => {}
                    (false, true) => rejected.push(name.to_string()),
                    (false, false) => unresolved.push(name.to_string()),
                }
            }
        }
        rest = &after[close + 1..];
    }
    path.push_str(rest);

    let remaining = payload
        .iter()
        .filter(|(key, _)| !used.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    BoundPath {
        path,
        remaining,
        unresolved,
        rejected,
    }
}

/// Percent-encode `text` as a single path segment.
///
/// Returns `None` for `.` and `..`, which no encoding keeps literal.
pub fn encode_segment(text: &str) -> Option<String> {
    if text == "." || text == ".." {
        return None;
    }
    // form encoding writes spaces as '+'; a literal '+' is already %2B.
    let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
    Some(encoded.replace('+', "%20"))
}

/// String form of a payload value used in paths and query strings.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
