//! Bounded-time JSON fetches against a single upstream.
//!
//! # Responsibilities
//! - Issue one GET per call, no retries
//! - Enforce the target's deadline over the full request and body read
//! - Reject non-2xx statuses with a short diagnostic snippet
//! - Parse the body as JSON after trimming BOMs and whitespace

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tokio::time::timeout;

use crate::observability::metrics;
use crate::upstream::error::UpstreamError;
use crate::upstream::target::UpstreamTarget;

/// Maximum number of characters of an error body kept for diagnostics.
pub const SNIPPET_LIMIT: usize = 300;

const ACCEPT_JSON: &str = "application/json,text/plain,*/*";

/// Something that can fetch a target and return its JSON payload.
#[async_trait]
pub trait FetchJson: Send + Sync {
    async fn fetch(&self, target: &UpstreamTarget) -> Result<Value, UpstreamError>;
}

/// Fetcher backed by a shared, pooled `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_text(&self, target: &UpstreamTarget) -> Result<(u16, String), UpstreamError> {
        let response = self
            .client
            .get(&target.url)
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await
            .map_err(|e| UpstreamError::Request {
                target: target.name.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| UpstreamError::Request {
            target: target.name.clone(),
            reason: e.to_string(),
        })?;

        Ok((status, text))
    }
}

#[async_trait]
impl FetchJson for HttpFetcher {
    async fn fetch(&self, target: &UpstreamTarget) -> Result<Value, UpstreamError> {
        let start = Instant::now();

        // Dropping the in-flight future on timeout aborts the connection.
        let result = match timeout(target.timeout(), self.fetch_text(target)).await {
            Ok(Ok((status, text))) => parse_body(&target.name, status, &text),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(UpstreamError::Timeout {
                target: target.name.clone(),
                timeout_ms: target.timeout_ms,
            }),
        };

        match &result {
            Ok(_) => {
                metrics::record_upstream_fetch(&target.name, "ok", start);
                tracing::debug!(
                    target_name = %target.name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream fetch succeeded"
                );
            }
            Err(e) => {
                metrics::record_upstream_fetch(&target.name, e.kind(), start);
                tracing::warn!(
                    target_name = %target.name,
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream fetch failed"
                );
            }
        }

        result
    }
}

/// Validate a raw upstream response and parse its body.
pub fn parse_body(target: &str, status: u16, text: &str) -> Result<Value, UpstreamError> {
    if !(200..300).contains(&status) {
        return Err(UpstreamError::Http {
            target: target.to_string(),
            status,
            snippet: text.chars().take(SNIPPET_LIMIT).collect(),
        });
    }

    let trimmed = text.trim_matches(|c: char| c == '\u{feff}' || c.is_whitespace());
    if trimmed.is_empty() {
        return Err(UpstreamError::Empty {
            target: target.to_string(),
        });
    }

    serde_json::from_str(trimmed).map_err(|e| UpstreamError::Malformed {
        target: target.to_string(),
        reason: e.to_string(),
    })
}
