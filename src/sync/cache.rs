use std::{collections::HashMap, future::Future, sync::Arc};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use crate::sync::{
    fetcher::Fetcher,
    keys::{DASHBOARD_STATS_KEY, TRANSACTIONS_KEY_PREFIX},
};

const EVENT_CAPACITY: usize = 64;

/// Last known good value for a key, plus the error from the latest fetch if it failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheEntry {
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl CacheEntry {
    /// Deserialises the cached value, `None` if nothing was ever fetched.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.data.clone().map(serde_json::from_value)
    }

    pub fn is_stale(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Revalidated { key: String, ok: bool },
    /// Keys refetched after a mutation or pull-to-refresh.
    Invalidated { keys: Vec<String> },
}

/// Stale-while-revalidate cache keyed by request key.
///
/// A failed fetch never clears an entry: the previous value stays and the
/// error is attached next to it.
pub struct SyncCache {
    fetcher: Arc<dyn Fetcher>,
    entries: RwLock<HashMap<String, CacheEntry>>,
    events: broadcast::Sender<CacheEvent>,
}

impl SyncCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            fetcher,
            entries: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Starts tracking `key` and fetches it.
    pub async fn mount(&self, key: &str) -> CacheEntry {
        self.revalidate(key).await
    }

    pub async fn unmount(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    pub async fn revalidate(&self, key: &str) -> CacheEntry {
        let result = self.fetcher.fetch(key).await;
        let ok = result.is_ok();

        let snapshot = {
            let mut entries = self.entries.write().await;
            let entry = entries.entry(key.to_string()).or_default();
            match result {
                Ok(value) => {
                    entry.data = Some(value);
                    entry.error = None;
                }
                Err(message) => {
                    tracing::warn!(key, error = %message, "revalidation failed, keeping cached value");
                    entry.error = Some(message);
                }
            }
            entry.clone()
        };

        // Nobody listening is fine.
        let _ = self.events.send(CacheEvent::Revalidated {
            key: key.to_string(),
            ok,
        });
        snapshot
    }

    /// Window regained focus: refetch everything tracked.
    pub async fn focus(&self) -> usize {
        let keys = self.keys().await;
        for key in &keys {
            self.revalidate(key).await;
        }
        keys.len()
    }

    /// Refetches `key` if it is tracked. Returns whether it was.
    pub async fn invalidate(&self, key: &str) -> bool {
        if self.entries.read().await.contains_key(key) {
            self.revalidate(key).await;
            true
        } else {
            false
        }
    }

    /// Refetches every tracked key starting with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) -> Vec<String> {
        let keys: Vec<String> = self
            .keys()
            .await
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();
        for key in &keys {
            self.revalidate(key).await;
        }
        keys
    }

    /// Refetches every transaction listing and the dashboard stats, once each.
    pub async fn invalidate_transactions(&self) -> Vec<String> {
        let mut keys = self.invalidate_prefix(TRANSACTIONS_KEY_PREFIX).await;
        if self.invalidate(DASHBOARD_STATS_KEY).await {
            keys.push(DASHBOARD_STATS_KEY.to_string());
        }
        tracing::debug!(?keys, "cache invalidated");
        let _ = self.events.send(CacheEvent::Invalidated { keys: keys.clone() });
        keys
    }

    /// Pull-to-refresh.
    pub async fn refresh(&self) -> Vec<String> {
        self.invalidate_transactions().await
    }

    /// Runs a mutation and, only if it succeeds, invalidates the
    /// transaction listings and dashboard stats.
    pub async fn mutate<T, E, F>(&self, mutation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let result = mutation.await;
        if result.is_ok() {
            self.invalidate_transactions().await;
        }
        result
    }
}
