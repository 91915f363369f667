//! Merged feed: aggregation and memoization.
//!
//! # Data Flow
//! ```text
//! MergedFeed::load
//!     → cache.rs (fresh snapshot? serve it)
//!     → aggregator.rs (fan out to both upstreams, join, project)
//!     → envelope.rs (success envelope, serialized once)
//!     → cache.rs (swap in new snapshot)
//! ```
//!
//! # Design Decisions
//! - Time comes from an injected `Clock` so tests can step past the TTL
//! - The cache slot is an atomically swapped immutable snapshot
//! - No request coalescing: concurrent misses each aggregate, last write wins
//! - Failures are never memoized

pub mod aggregator;
pub mod cache;
pub mod clock;
pub mod envelope;
pub mod service;

pub use aggregator::Aggregator;
pub use cache::{CacheEntry, MemoCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use envelope::FeedEnvelope;
pub use service::{FeedLoad, MergedFeed};
