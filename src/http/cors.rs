//! Cross-origin response headers.

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::config::{ConfigError, CorsConfig};

/// A fixed set of CORS headers stamped onto every response of an endpoint,
/// error responses included.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl CorsPolicy {
    /// Headers for the merged feed endpoint.
    pub fn merged(config: &CorsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            headers: vec![
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, value(&config.allow_origin, "cors.allow_origin")?),
                (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET,OPTIONS")),
                (header::ACCESS_CONTROL_ALLOW_HEADERS, value(&config.allow_headers, "cors.allow_headers")?),
                (header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(config.max_age_secs)),
                (header::VARY, HeaderValue::from_static("Origin")),
            ],
        })
    }

    /// Headers for the passthrough proxy.
    pub fn passthrough(config: &CorsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            headers: vec![
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, value(&config.allow_origin, "cors.allow_origin")?),
                (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, HEAD, OPTIONS")),
                (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*")),
                (
                    HeaderName::from_static("cross-origin-resource-policy"),
                    HeaderValue::from_static("cross-origin"),
                ),
                (header::VARY, HeaderValue::from_static("Origin")),
            ],
        })
    }

    /// Set (overwrite) every policy header.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
    }
}

fn value(raw: &str, field: &'static str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(raw).map_err(|_| ConfigError::InvalidHeader(field))
}
