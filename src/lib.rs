//! Edge gateway for traffic-data feeds.
//!
//! Serves a merged view of two upstream feeds behind a short memoization
//! window, plus an allow-listed single-URL proxy, so a browser dashboard
//! never calls the provider directly.

pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
