//! Concurrent fan-out to both upstream feeds.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::feed::clock::Clock;
use crate::feed::envelope::FeedEnvelope;
use crate::upstream::{FetchJson, UpstreamError, UpstreamTarget};

/// Fetches the primary and secondary feeds and merges them.
pub struct Aggregator {
    fetcher: Arc<dyn FetchJson>,
    primary: UpstreamTarget,
    secondary: UpstreamTarget,
    clock: Arc<dyn Clock>,
}

impl Aggregator {
    pub fn new(
        fetcher: Arc<dyn FetchJson>,
        primary: UpstreamTarget,
        secondary: UpstreamTarget,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fetcher,
            primary,
            secondary,
            clock,
        }
    }

    /// Fetch both feeds concurrently and build a success envelope.
    ///
    /// Fails as a whole on the first failure the join observes. The sibling
    /// fetch keeps running in its own task and its result is discarded.
    pub async fn aggregate(&self) -> Result<FeedEnvelope, UpstreamError> {
        let primary = self.spawn_fetch(&self.primary);
        let secondary = self.spawn_fetch(&self.secondary);

        let (primary_payload, secondary_payload) = tokio::try_join!(primary, secondary)?;

        let envelope = FeedEnvelope::success(
            self.clock.now(),
            self.primary.parse.apply(primary_payload),
            self.secondary.parse.apply(secondary_payload),
        );

        tracing::debug!(
            fetched_at = envelope.fetched_at.as_deref().unwrap_or_default(),
            "Aggregation complete"
        );

        Ok(envelope)
    }

    pub fn primary(&self) -> &UpstreamTarget {
        &self.primary
    }

    pub fn secondary(&self) -> &UpstreamTarget {
        &self.secondary
    }

    // Dropping the returned future detaches the task instead of aborting it.
    fn spawn_fetch(
        &self,
        target: &UpstreamTarget,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send + 'static {
        let fetcher = Arc::clone(&self.fetcher);
        let owned = target.clone();
        let name = target.name.clone();
        let handle = tokio::spawn(async move { fetcher.fetch(&owned).await });

        async move {
            handle.await.map_err(|e| UpstreamError::Join {
                target: name,
                reason: e.to_string(),
            })?
        }
    }
}
