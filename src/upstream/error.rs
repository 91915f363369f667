//! Upstream fetch errors.

use thiserror::Error;

/// Errors produced by a single upstream fetch.
///
/// The `Display` text is what clients see in the envelope's `error` field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The request did not complete within the target's deadline.
    #[error("Upstream timeout after {timeout_ms}ms ({target})")]
    Timeout { target: String, timeout_ms: u64 },

    /// Non-2xx status, with a bounded snippet of the body.
    #[error("Upstream HTTP {status}: {snippet}")]
    Http {
        target: String,
        status: u16,
        snippet: String,
    },

    /// Nothing left after trimming BOMs and whitespace.
    #[error("Empty upstream response ({target})")]
    Empty { target: String },

    /// Body is not valid JSON.
    #[error("Malformed upstream JSON ({target}): {reason}")]
    Malformed { target: String, reason: String },

    /// Connection or transport failure.
    #[error("Upstream request failed ({target}): {reason}")]
    Request { target: String, reason: String },

    /// The spawned fetch task panicked or was aborted.
    #[error("Upstream task for {target} did not complete: {reason}")]
    Join { target: String, reason: String },
}

impl UpstreamError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::Http { .. } => "http_error",
            UpstreamError::Empty { .. } | UpstreamError::Malformed { .. } => "malformed",
            UpstreamError::Request { .. } => "request",
            UpstreamError::Join { .. } => "join",
        }
    }

    /// Name of the target that failed.
    pub fn target(&self) -> &str {
        match self {
            UpstreamError::Timeout { target, .. }
            | UpstreamError::Http { target, .. }
            | UpstreamError::Empty { target }
            | UpstreamError::Malformed { target, .. }
            | UpstreamError::Request { target, .. }
            | UpstreamError::Join { target, .. } => target,
        }
    }
}
