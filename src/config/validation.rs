//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Upstream URLs parse and use http(s)
//! - Value ranges (timeouts and TTL > 0)
//! - Header-bound strings are valid header values
//! - Route paths are distinct and rooted
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use axum::http::HeaderValue;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::upstream::UpstreamTarget;

/// A single semantic problem in a config.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: String, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: String },

    #[error("{field}: not a valid header value")]
    InvalidHeader { field: String },

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: String, value: String },

    #[error("{field}: path must start with '/' (got '{value}')")]
    InvalidPath { field: String, value: String },

    #[error("route path '{0}' is used more than once")]
    DuplicatePath(String),

    #[error("passthrough.allow_list must not be empty")]
    EmptyAllowList,

    #[error("upstream target names must differ")]
    DuplicateTargetName,

    #[error("timeouts.request_secs ({request_ms}ms) must exceed the slowest upstream timeout ({upstream_ms}ms)")]
    RequestDeadlineTooShort { request_ms: u64, upstream_ms: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address".into(),
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address".into(),
            value: config.observability.metrics_address.clone(),
        });
    }

    check_target("upstreams.primary", &config.upstreams.primary, &mut errors);
    check_target("upstreams.secondary", &config.upstreams.secondary, &mut errors);
    if config.upstreams.primary.name == config.upstreams.secondary.name {
        errors.push(ValidationError::DuplicateTargetName);
    }

    check_positive("memo.ttl_ms", config.memo.ttl_ms, &mut errors);
    check_positive("timeouts.request_secs", config.timeouts.request_secs, &mut errors);
    check_positive("passthrough.timeout_ms", config.passthrough.timeout_ms, &mut errors);

    let upstream_ms = config
        .upstreams
        .primary
        .timeout_ms
        .max(config.upstreams.secondary.timeout_ms);
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    if request_ms > 0 && request_ms <= upstream_ms {
        errors.push(ValidationError::RequestDeadlineTooShort {
            request_ms,
            upstream_ms,
        });
    }

    check_header("edge_cache.success", &config.edge_cache.success, &mut errors);
    check_header("edge_cache.failure", &config.edge_cache.failure, &mut errors);
    check_header("cors.allow_origin", &config.cors.allow_origin, &mut errors);
    check_header("cors.allow_headers", &config.cors.allow_headers, &mut errors);
    check_header("passthrough.user_agent", &config.passthrough.user_agent, &mut errors);

    if config.passthrough.allow_list.iter().all(|h| h.trim().is_empty()) {
        errors.push(ValidationError::EmptyAllowList);
    }

    let paths = [
        ("http.merged_path", &config.http.merged_path),
        ("http.proxy_path", &config.http.proxy_path),
        ("http.health_path", &config.http.health_path),
    ];
    for (i, (field, path)) in paths.iter().enumerate() {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidPath {
                field: field.to_string(),
                value: path.to_string(),
            });
        }
        if paths[..i].iter().any(|(_, other)| other == path) {
            errors.push(ValidationError::DuplicatePath(path.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_target(field: &str, target: &UpstreamTarget, errors: &mut Vec<ValidationError>) {
    let valid = url::Url::parse(&target.url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field: format!("{field}.url"),
            value: target.url.clone(),
        });
    }
    check_positive(&format!("{field}.timeout_ms"), target.timeout_ms, errors);
}

fn check_positive(field: &str, value: u64, errors: &mut Vec<ValidationError>) {
    if value == 0 {
        errors.push(ValidationError::Zero {
            field: field.to_string(),
        });
    }
}

fn check_header(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidHeader {
            field: field.to_string(),
        });
    }
}
