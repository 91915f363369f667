//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout)
//!     → merged.rs (preflight / method check / memo / aggregate)
//!       or passthrough.rs (allow-list check, relay)
//!     → cors.rs (CORS headers on every response, errors included)
//!     → Send to client
//! ```

pub mod cors;
pub mod merged;
pub mod passthrough;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
