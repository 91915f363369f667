//! Scripted fetcher for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::upstream::{FetchJson, UpstreamError, UpstreamTarget};

/// Returns canned results per target name, optionally after a delay.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Result<Value, UpstreamError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, target: &str, result: Result<Value, UpstreamError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(target.to_string(), result);
    }

    pub(crate) fn delay(&self, target: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(target.to_string(), delay);
    }

    /// Number of fetches started.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of fetches that ran to completion.
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchJson for ScriptedFetcher {
    async fn fetch(&self, target: &UpstreamTarget) -> Result<Value, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&target.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let result = self
            .responses
            .lock()
            .unwrap()
            .get(&target.name)
            .cloned()
            .unwrap_or_else(|| {
                Err(UpstreamError::Request {
                    target: target.name.clone(),
                    reason: "no scripted response".into(),
                })
            });

        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
