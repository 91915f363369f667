//! Single-slot memoization of the last successful envelope.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use axum::body::Bytes;
use chrono::{DateTime, Utc};

use crate::feed::envelope::FeedEnvelope;
use crate::observability::metrics;

/// A memoized envelope plus the exact bytes served for it.
#[derive(Debug)]
pub struct CacheEntry {
    pub stored_at: DateTime<Utc>,
    pub envelope: FeedEnvelope,
    pub body: Bytes,
}

impl CacheEntry {
    pub fn new(stored_at: DateTime<Utc>, envelope: FeedEnvelope) -> Result<Self, serde_json::Error> {
        let body = envelope.to_bytes()?;
        Ok(Self {
            stored_at,
            envelope,
            body,
        })
    }

    /// True while the entry is younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        // Negative ages (clock behind the writer) count as fresh.
        (now - self.stored_at)
            .to_std()
            .map(|age| age < ttl)
            .unwrap_or(true)
    }
}

/// Process-wide, unkeyed, time-bounded cache.
///
/// Readers load an `Arc` snapshot; writers swap in a new one. Concurrent
/// writers race and the last one wins.
#[derive(Debug)]
pub struct MemoCache {
    slot: ArcSwapOption<CacheEntry>,
    ttl: Duration,
}

impl MemoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry at `now`, if any.
    pub fn get(&self, now: DateTime<Utc>) -> Option<Arc<CacheEntry>> {
        let hit = self
            .slot
            .load_full()
            .filter(|entry| entry.is_fresh(now, self.ttl));
        metrics::record_memo_lookup(hit.is_some());
        hit
    }

    /// Store `entry`, replacing whatever was there. Failed envelopes are
    /// ignored so an outage is never held for the TTL.
    pub fn put(&self, entry: Arc<CacheEntry>) {
        if !entry.envelope.ok {
            tracing::debug!("Refusing to memoize failed envelope");
            return;
        }
        self.slot.store(Some(entry));
    }

    /// Current entry regardless of age.
    pub fn peek(&self) -> Option<Arc<CacheEntry>> {
        self.slot.load_full()
    }
}
