//! Cache-fronted access to the merged feed.

use std::sync::Arc;

use crate::error::GatewayError;
use crate::feed::aggregator::Aggregator;
use crate::feed::cache::{CacheEntry, MemoCache};
use crate::feed::clock::Clock;

/// Where a served envelope came from.
#[derive(Debug, Clone)]
pub enum FeedLoad {
    CacheHit(Arc<CacheEntry>),
    Aggregated(Arc<CacheEntry>),
}

impl FeedLoad {
    pub fn entry(&self) -> &Arc<CacheEntry> {
        match self {
            FeedLoad::CacheHit(entry) | FeedLoad::Aggregated(entry) => entry,
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, FeedLoad::CacheHit(_))
    }
}

/// The aggregator behind a memoization cache.
pub struct MergedFeed {
    aggregator: Aggregator,
    cache: MemoCache,
    clock: Arc<dyn Clock>,
}

impl MergedFeed {
    pub fn new(aggregator: Aggregator, cache: MemoCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            cache,
            clock,
        }
    }

    /// Serve the memoized envelope or aggregate a new one.
    ///
    /// On failure the cache is left untouched.
    pub async fn load(&self) -> Result<FeedLoad, GatewayError> {
        if let Some(entry) = self.cache.get(self.clock.now()) {
            tracing::debug!(stored_at = %entry.stored_at, "Serving memoized feed");
            return Ok(FeedLoad::CacheHit(entry));
        }

        let envelope = self.aggregator.aggregate().await?;
        let entry = Arc::new(CacheEntry::new(self.clock.now(), envelope)?);
        self.cache.put(Arc::clone(&entry));

        Ok(FeedLoad::Aggregated(entry))
    }

    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::clock::ManualClock;
    use crate::upstream::testing::ScriptedFetcher;
    use crate::upstream::{Projection, UpstreamError, UpstreamTarget};
    use chrono::Utc;
    use serde_json::json;
    use std::time::Duration;

    fn feed(fetcher: Arc<ScriptedFetcher>, clock: Arc<ManualClock>) -> MergedFeed {
        let primary = UpstreamTarget::new("primary", "http://primary.invalid/");
        let secondary = UpstreamTarget::new("secondary", "http://secondary.invalid/")
            .with_projection(Projection::Field("usersOnJams".into()));
        let aggregator = Aggregator::new(fetcher, primary, secondary, clock.clone());
        MergedFeed::new(aggregator, MemoCache::new(Duration::from_secs(10)), clock)
    }

    fn healthy_fetcher() -> Arc<ScriptedFetcher> {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond("primary", Ok(json!({ "id": 1 })));
        fetcher.respond("secondary", Ok(json!({ "usersOnJams": [{ "x": 1 }] })));
        fetcher
    }

    #[tokio::test]
    async fn test_second_load_within_ttl_is_a_hit() {
        let fetcher = healthy_fetcher();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let feed = feed(fetcher.clone(), clock.clone());

        let first = feed.load().await.unwrap();
        assert!(!first.is_cache_hit());

        clock.advance(Duration::from_secs(5));
        let second = feed.load().await.unwrap();
        assert!(second.is_cache_hit());
        assert_eq!(first.entry().body, second.entry().body);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_exactly_one_aggregation() {
        let fetcher = healthy_fetcher();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let feed = feed(fetcher.clone(), clock.clone());

        feed.load().await.unwrap();
        clock.advance(Duration::from_secs(10));

        let reloaded = feed.load().await.unwrap();
        assert!(!reloaded.is_cache_hit());
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test]
    async fn test_failure_leaves_prior_success_servable() {
        let fetcher = healthy_fetcher();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let feed = feed(fetcher.clone(), clock.clone());

        let first = feed.load().await.unwrap();
        clock.advance(Duration::from_secs(11));
        fetcher.respond(
            "secondary",
            Err(UpstreamError::Timeout {
                target: "secondary".into(),
                timeout_ms: 12_000,
            }),
        );

        let err = feed.load().await.unwrap_err();
        assert!(err.to_string().contains("timeout"));

        let kept = feed.cache().peek().unwrap();
        assert_eq!(kept.body, first.entry().body);
    }

    #[tokio::test]
    async fn test_failure_on_cold_cache_stores_nothing() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond("primary", Ok(json!({ "id": 1 })));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let feed = feed(fetcher, clock);

        assert!(feed.load().await.is_err());
        assert!(feed.cache().peek().is_none());
    }
}
