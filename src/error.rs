//! Gateway-level errors and their HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Result type alias for request handling.
pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

/// Errors surfaced to clients. Handlers translate these, and only these,
/// into status codes and JSON bodies.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Passthrough request without a `url` parameter.
    #[error("Missing ?url=")]
    MissingTarget,

    /// Passthrough target outside the allow-list, or not a URL at all.
    #[error("Host not allowed")]
    HostNotAllowed { target: String },

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Merged-feed aggregation failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Passthrough upstream call failed.
    #[error("Proxy error")]
    Passthrough { detail: String },

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingTarget => StatusCode::BAD_REQUEST,
            GatewayError::HostNotAllowed { .. } => StatusCode::FORBIDDEN,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Upstream(_) | GatewayError::Passthrough { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
