//! Allow-listed single-URL proxy.
//!
//! `GET {proxy_path}?url=<target>` relays the target's response verbatim
//! (status, headers minus hop-by-hop, streamed body) with CORS headers
//! merged on top. No caching, no aggregation.

use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
};
use serde_json::json;

use crate::config::{ConfigError, CorsConfig, PassthroughConfig};
use crate::error::GatewayError;
use crate::http::cors::CorsPolicy;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::headers::strip_hop_by_hop;
use crate::security::HostAllowList;

/// Passthrough wiring built once at startup.
#[derive(Debug, Clone)]
pub struct Passthrough {
    client: reqwest::Client,
    allow_list: HostAllowList,
    user_agent: HeaderValue,
    timeout: Duration,
    cors: CorsPolicy,
}

impl Passthrough {
    pub fn new(
        config: &PassthroughConfig,
        cors: &CorsConfig,
        client: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            allow_list: HostAllowList::new(&config.allow_list),
            user_agent: HeaderValue::from_str(&config.user_agent)
                .map_err(|_| ConfigError::InvalidHeader("passthrough.user_agent"))?,
            timeout: Duration::from_millis(config.timeout_ms),
            cors: CorsPolicy::passthrough(cors)?,
        })
    }

    /// Validate the caller's target and relay it.
    pub async fn forward(&self, target: Option<String>) -> Result<Response, GatewayError> {
        let target = target
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::MissingTarget)?;
        let url = self.allow_list.check(&target)?;

        let upstream = self
            .client
            .get(url)
            .header(header::USER_AGENT, self.user_agent.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Passthrough {
                detail: e.to_string(),
            })?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_hop_by_hop(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Axum handler for the passthrough proxy.
pub async fn passthrough_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let start = Instant::now();
    let passthrough = &state.passthrough;

    let mut response = if method == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let target = query.as_deref().and_then(target_param);
        match passthrough.forward(target).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id(&headers),
                    error = %e,
                    "Passthrough request failed"
                );
                error_response(&e)
            }
        }
    };

    passthrough.cors.apply(response.headers_mut());
    metrics::record_request("passthrough", response.status().as_u16(), start);
    response
}

/// First `url` parameter of a raw query string, percent-decoded.
fn target_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
}

fn error_response(error: &GatewayError) -> Response {
    let body = match error {
        GatewayError::HostNotAllowed { target } => {
            json!({ "error": error.to_string(), "target": target })
        }
        GatewayError::Passthrough { detail } => {
            json!({ "error": error.to_string(), "detail": detail })
        }
        other => json!({ "error": other.to_string() }),
    };

    let bytes = serde_json::to_vec(&body)
        .map(Bytes::from)
        .unwrap_or_else(|_| Bytes::from_static(br#"{"error":"Proxy error"}"#));
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = error.status_code();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
