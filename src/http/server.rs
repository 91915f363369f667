//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Build shared state: fetcher, memo cache, CORS and cache policies
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ConfigError, GatewayConfig};
use crate::feed::{Aggregator, Clock, MemoCache, MergedFeed, SystemClock};
use crate::http::cors::CorsPolicy;
use crate::http::merged::{merged_feed_handler, EdgeCachePolicy};
use crate::http::passthrough::{passthrough_handler, Passthrough};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::upstream::{FetchJson, HttpFetcher};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<MergedFeed>,
    pub merged_cors: Arc<CorsPolicy>,
    pub edge_cache: Arc<EdgeCachePolicy>,
    pub passthrough: Arc<Passthrough>,
}

impl AppState {
    /// Wire state from config and the injected collaborators.
    pub fn new(
        config: &GatewayConfig,
        fetcher: Arc<dyn FetchJson>,
        client: reqwest::Client,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let aggregator = Aggregator::new(
            fetcher,
            config.upstreams.primary.clone(),
            config.upstreams.secondary.clone(),
            Arc::clone(&clock),
        );
        let cache = MemoCache::new(Duration::from_millis(config.memo.ttl_ms));

        Ok(Self {
            feed: Arc::new(MergedFeed::new(aggregator, cache, clock)),
            merged_cors: Arc::new(CorsPolicy::merged(&config.cors)?),
            edge_cache: Arc::new(EdgeCachePolicy::from_config(&config.edge_cache)?),
            passthrough: Arc::new(Passthrough::new(&config.passthrough, &config.cors, client)?),
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server backed by real HTTP upstreams and the system clock.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let fetcher = Arc::new(HttpFetcher::new(client.clone()));
        let state = AppState::new(&config, fetcher, client, Arc::new(SystemClock::new()))?;
        Ok(Self::with_state(config, state))
    }

    /// Create a server around prebuilt state.
    pub fn with_state(config: GatewayConfig, state: AppState) -> Self {
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            merged_path = %self.config.http.merged_path,
            proxy_path = %self.config.http.proxy_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    Router::new()
        .route(&config.http.merged_path, any(merged_feed_handler))
        .route(&config.http.proxy_path, any(passthrough_handler))
        .route(&config.http.health_path, get(health_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
