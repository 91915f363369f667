//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::upstream::{Projection, UpstreamTarget};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Endpoint paths.
    pub http: HttpConfig,

    /// The two feeds merged by the aggregation endpoint.
    pub upstreams: UpstreamsConfig,

    /// In-process memoization window.
    pub memo: MemoConfig,

    /// `Cache-Control` directives for shared caches.
    pub edge_cache: EdgeCacheConfig,

    /// Cross-origin headers for the merged endpoint.
    pub cors: CorsConfig,

    /// Allow-listed single-URL proxy.
    pub passthrough: PassthroughConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Path of the merged feed endpoint.
    pub merged_path: String,

    /// Path of the passthrough proxy.
    pub proxy_path: String,

    /// Path of the liveness probe.
    pub health_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            merged_path: "/api/waze-merged".to_string(),
            proxy_path: "/api/proxy".to_string(),
            health_path: "/healthz".to_string(),
        }
    }
}

/// Primary and secondary feed targets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Full payload is passed through.
    pub primary: UpstreamTarget,

    /// Payload is reduced to a single field.
    pub secondary: UpstreamTarget,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            primary: UpstreamTarget::new(
                "waze_partner",
                "https://www.waze.com/row-partnerhub-api/partners/11867436614/waze-feeds/4e8ef399-d6b9-4338-9840-7c2beacd235b?format=1",
            ),
            secondary: UpstreamTarget::new(
                "waze_tvt",
                "https://www.waze.com/row-partnerhub-api/feeds-tvt/?id=1709296452339",
            )
            .with_projection(Projection::Field("usersOnJams".to_string())),
        }
    }
}

/// Memoization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoConfig {
    /// How long a successful envelope is served from memory.
    pub ttl_ms: u64,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self { ttl_ms: 10_000 }
    }
}

/// Edge cache directives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeCacheConfig {
    /// Sent with 200 responses (fresh or memoized).
    pub success: String,

    /// Sent with 405 and 502 responses.
    pub failure: String,
}

impl Default for EdgeCacheConfig {
    fn default() -> Self {
        Self {
            success: "public, s-maxage=30, stale-while-revalidate=300".to_string(),
            failure: "public, s-maxage=10, stale-while-revalidate=60".to_string(),
        }
    }
}

/// CORS headers for the merged endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_headers: String,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_headers: "Content-Type, Authorization".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Passthrough proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PassthroughConfig {
    /// Hostnames a caller may target (exact, case-insensitive).
    pub allow_list: Vec<String>,

    /// `User-Agent` sent upstream.
    pub user_agent: String,

    /// Deadline for the upstream response headers.
    pub timeout_ms: u64,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            allow_list: vec![
                "www.waze.com".to_string(),
                "m.highwaysengland.co.uk".to_string(),
                "nationalhighways.co.uk".to_string(),
            ],
            user_agent: "TfGM-OCC-Map/1.0".to_string(),
            timeout_ms: 15_000,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
