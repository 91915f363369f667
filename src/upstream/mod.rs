//! Upstream feed access.
//!
//! # Data Flow
//! ```text
//! UpstreamTarget (static config)
//!     → fetcher.rs (bounded-time GET, status check, BOM-tolerant JSON parse)
//!     → Projection::apply (full payload or single array field)
//!     → handed to the aggregator
//! ```
//!
//! # Design Decisions
//! - One attempt per call; retry policy belongs to the caller
//! - Every call has its own deadline; a timeout drops only that request
//! - Errors carry the target name so logs identify the failing feed

pub mod error;
pub mod fetcher;
pub mod target;

#[cfg(test)]
pub(crate) mod testing;

pub use error::UpstreamError;
pub use fetcher::{FetchJson, HttpFetcher};
pub use target::{Projection, ProjectionParseError, UpstreamTarget};
