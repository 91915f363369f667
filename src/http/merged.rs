//! Merged feed endpoint.
//!
//! # States
//! ```text
//! OPTIONS            → Preflight        → 204, empty
//! not GET            → MethodRejected   → 405, failure directive
//! GET, fresh memo    → CacheHit         → 200, success directive
//! GET, stale memo    → Aggregating
//!     ok             → Success          → 200, success directive (memoized)
//!     err            → UpstreamFailure  → 502, failure directive
//! ```
//! Every state carries the CORS headers.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
};

use crate::config::{ConfigError, EdgeCacheConfig};
use crate::error::GatewayError;
use crate::feed::{FeedEnvelope, FeedLoad, MergedFeed};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// `Cache-Control` values for shared caches.
#[derive(Debug, Clone)]
pub struct EdgeCachePolicy {
    success: HeaderValue,
    failure: HeaderValue,
}

impl EdgeCachePolicy {
    pub fn from_config(config: &EdgeCacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            success: HeaderValue::from_str(&config.success)
                .map_err(|_| ConfigError::InvalidHeader("edge_cache.success"))?,
            failure: HeaderValue::from_str(&config.failure)
                .map_err(|_| ConfigError::InvalidHeader("edge_cache.failure"))?,
        })
    }
}

/// Terminal state of one request.
#[derive(Debug)]
pub enum FeedOutcome {
    Preflight,
    MethodRejected,
    CacheHit(Bytes),
    Success(Bytes),
    UpstreamFailure(GatewayError),
}

impl FeedOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            FeedOutcome::Preflight => "preflight",
            FeedOutcome::MethodRejected => "method_rejected",
            FeedOutcome::CacheHit(_) => "cache_hit",
            FeedOutcome::Success(_) => "success",
            FeedOutcome::UpstreamFailure(_) => "upstream_failure",
        }
    }
}

/// Axum handler for the merged feed.
pub async fn merged_feed_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let outcome = resolve(&state.feed, &method).await;

    match &outcome {
        FeedOutcome::UpstreamFailure(e) => tracing::warn!(
            request_id = %request_id(&headers),
            error = %e,
            "Merged feed unavailable"
        ),
        other => tracing::debug!(
            request_id = %request_id(&headers),
            method = %method,
            outcome = other.label(),
            "Merged feed request"
        ),
    }

    let mut response = render(outcome, &state.edge_cache);
    state.merged_cors.apply(response.headers_mut());

    metrics::record_request("merged", response.status().as_u16(), start);
    response
}

/// Walk the state machine up to a terminal state.
pub async fn resolve(feed: &MergedFeed, method: &Method) -> FeedOutcome {
    if method == Method::OPTIONS {
        return FeedOutcome::Preflight;
    }
    if method != Method::GET {
        return FeedOutcome::MethodRejected;
    }

    match feed.load().await {
        Ok(FeedLoad::CacheHit(entry)) => FeedOutcome::CacheHit(entry.body.clone()),
        Ok(FeedLoad::Aggregated(entry)) => FeedOutcome::Success(entry.body.clone()),
        Err(e) => FeedOutcome::UpstreamFailure(e),
    }
}

/// Build the response for a terminal state, minus CORS headers.
pub fn render(outcome: FeedOutcome, policy: &EdgeCachePolicy) -> Response {
    match outcome {
        FeedOutcome::Preflight => with_status(Response::new(Body::empty()), StatusCode::NO_CONTENT),
        FeedOutcome::MethodRejected => {
            failure_response(GatewayError::MethodNotAllowed, &policy.failure)
        }
        FeedOutcome::CacheHit(body) | FeedOutcome::Success(body) => {
            json_response(StatusCode::OK, body, &policy.success)
        }
        FeedOutcome::UpstreamFailure(e) => failure_response(e, &policy.failure),
    }
}

fn failure_response(error: GatewayError, cache_control: &HeaderValue) -> Response {
    let status = error.status_code();
    let body = FeedEnvelope::failure(error.to_string())
        .to_bytes()
        .unwrap_or_else(|_| Bytes::from_static(br#"{"ok":false,"error":"Internal error"}"#));
    json_response(status, body, cache_control)
}

fn json_response(status: StatusCode, body: Bytes, cache_control: &HeaderValue) -> Response {
    let mut response = with_status(Response::new(Body::from(body)), status);
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    headers.insert(header::CACHE_CONTROL, cache_control.clone());
    response
}

fn with_status(mut response: Response, status: StatusCode) -> Response {
    *response.status_mut() = status;
    response
}
