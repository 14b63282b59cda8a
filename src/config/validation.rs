//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//! - Check addresses and the downstream URL parse
//! - Check route templates are well-formed paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::BridgeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("downstream.base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("downstream.base_url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("downstream.base_url '{0}' must not carry a query or fragment")]
    BaseUrlQueryOrFragment(String),

    #[error(
        "downstream.request_timeout_secs ({default}) exceeds downstream.max_request_timeout_secs ({max})"
    )]
    DefaultTimeoutAboveMax { default: u64, max: u64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("health_check.path '{0}' must start with '/'")]
    InvalidHealthPath(String),

    #[error("routing.routes contains an empty method name")]
    EmptyMethod,

    #[error("route '{method}' template '{template}' is invalid: {reason}")]
    InvalidTemplate {
        method: String,
        template: String,
        reason: &'static str,
    },

    #[error("routing.fallback_prefix '{0}' must start with '/'")]
    InvalidFallbackPrefix(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_addresses(config, &mut errors);
    validate_downstream(config, &mut errors);
    validate_routes(config, &mut errors);

    if config.listener.max_concurrency == 0 {
        errors.push(ValidationError::Zero("listener.max_concurrency"));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("listener.max_body_bytes"));
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::Zero("health_check.timeout_secs"));
    }
    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath(config.health_check.path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_addresses(config: &BridgeConfig, errors: &mut Vec<ValidationError>) {
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
}

fn validate_downstream(config: &BridgeConfig, errors: &mut Vec<ValidationError>) {
    let downstream = &config.downstream;
    match Url::parse(&downstream.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(downstream.base_url.clone()));
        }
        Ok(url) if url.query().is_some() || url.fragment().is_some() => {
            errors.push(ValidationError::BaseUrlQueryOrFragment(downstream.base_url.clone()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: downstream.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if downstream.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("downstream.request_timeout_secs"));
    }
    if downstream.max_request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("downstream.max_request_timeout_secs"));
    } else if downstream.request_timeout_secs > downstream.max_request_timeout_secs {
        errors.push(ValidationError::DefaultTimeoutAboveMax {
            default: downstream.request_timeout_secs,
            max: downstream.max_request_timeout_secs,
        });
    }
    if downstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("downstream.connect_timeout_secs"));
    }
}

fn validate_routes(config: &BridgeConfig, errors: &mut Vec<ValidationError>) {
    let routing = &config.routing;
    if !routing.fallback_prefix.starts_with('/') {
        errors.push(ValidationError::InvalidFallbackPrefix(routing.fallback_prefix.clone()));
    }

    for (method, template) in &routing.routes {
        if method.trim().is_empty() {
            errors.push(ValidationError::EmptyMethod);
            continue;
        }
        if let Some(reason) = template_problem(template) {
            errors.push(ValidationError::InvalidTemplate {
                method: method.clone(),
                template: template.clone(),
                reason,
            });
        }
    }
}

fn template_problem(template: &str) -> Option<&'static str> {
    if !template.starts_with('/') {
        return Some("must start with '/'");
    }

    let mut open = false;
    for c in template.chars() {
        match c {
            '{' if open => return Some("nested '{'"),
            '{' => open = true,
            '}' if !open => return Some("unmatched '}'"),
            '}' => open = false,
            _ => {}
        }
    }
    if open {
        return Some("unterminated placeholder");
    }
    None
}
