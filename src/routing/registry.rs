//! Method-to-endpoint lookup.
//!
//! # Responsibilities
//! - Store the configured method → template table
//! - Resolve a method to an `EndpointSpec` (template + inferred verb)
//! - Fall back to `<prefix><lowercase(method)>` for unmapped methods
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) exact-match lookup via HashMap
//! - Unknown methods degrade to the convention instead of erroring;
//!   the fallback may or may not exist downstream

use std::collections::{BTreeMap, HashMap};

use crate::config::RoutingConfig;
use crate::routing::verb::Verb;

/// A resolved endpoint: path template plus the verb to call it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Path template with zero or more `{name}` placeholders.
    pub template: String,
    pub verb: Verb,
}

/// Static routing table built once at startup.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    routes: HashMap<String, String>,
    fallback_prefix: String,
}

impl EndpointRegistry {
    /// Build the registry from routing configuration.
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.routes.clone(), config.fallback_prefix.clone())
    }

    pub fn new(routes: BTreeMap<String, String>, fallback_prefix: impl Into<String>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
            fallback_prefix: fallback_prefix.into(),
        }
    }

    /// Resolve a method name to its endpoint.
    ///
    /// The verb always comes from [`Verb::infer`], whether or not the
    /// method has an explicit entry.
    pub fn resolve(&self, method: &str) -> EndpointSpec {
        let template = match self.routes.get(method) {
            Some(template) => template.clone(),
            None => {
                tracing::debug!(method = %method, "No explicit route, using fallback convention");
                self.fallback_template(method)
            }
        };

        EndpointSpec {
            template,
            verb: Verb::infer(method),
        }
    }

    /// Template used for methods without an explicit entry.
    pub fn fallback_template(&self, method: &str) -> String {
        format!("{}{}", self.fallback_prefix, method.to_lowercase())
    }

    pub fn is_mapped(&self, method: &str) -> bool {
        self.routes.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}
