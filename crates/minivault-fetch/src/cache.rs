//! Deduplicating fetch cache using moka
//!
//! One [`FetchCache`] is built at the composition root and shared by every
//! section. Sections only read through it; all writes happen here.
//!
//! - Reads of a key within the dedupe window reuse the resolved value
//! - Concurrent reads of a key share one in-flight request
//! - Failed requests are retried per [`FetchConfig`] before surfacing
//! - Past the window, a key with a last good value answers with it at once
//!   and is refetched in the background

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetcher::Fetcher;
use chrono::{DateTime, Utc};
use dashmap::DashSet;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Last resolved value for a resource identifier
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Parsed response
    pub value: Arc<Value>,
    /// When the value was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Keys inside their dedupe window
    pub entry_count: u64,
    /// Keys with a last good value
    pub known_keys: u64,
    /// Underlying fetch attempts, retries included
    pub fetch_attempts: u64,
}

/// Shared fetch cache; clones share state
#[derive(Clone)]
pub struct FetchCache {
    inner: Arc<Inner>,
}

struct Inner {
    config: FetchConfig,
    fetcher: Arc<dyn Fetcher>,
    /// Values inside their dedupe window
    fresh: Cache<String, CacheEntry>,
    /// Last good value per key, same capacity bound, no expiry
    previous: Cache<String, CacheEntry>,
    /// Keys with a background refetch running
    refreshing: DashSet<String>,
    attempts: AtomicU64,
}

impl std::fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCache")
            .field("config", &self.inner.config)
            .field("fresh", &self.inner.fresh.entry_count())
            .field("previous", &self.inner.previous.entry_count())
            .field("refreshing", &self.inner.refreshing.len())
            .finish_non_exhaustive()
    }
}

impl FetchCache {
    /// Create cache with default options
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_config(fetcher, FetchConfig::default())
    }

    /// Create cache with explicit options
    #[must_use]
    pub fn with_config(fetcher: Arc<dyn Fetcher>, config: FetchConfig) -> Self {
        let inner = Inner {
            fresh: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.dedupe_interval)
                .build(),
            previous: Cache::builder().max_capacity(config.max_capacity).build(),
            refreshing: DashSet::new(),
            attempts: AtomicU64::new(0),
            fetcher,
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Active options
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.inner.config
    }

    /// Read a resource
    ///
    /// Inside the dedupe window the resolved value is reused. Past it, with
    /// keep-previous-data on and a last good value known, that value is
    /// returned immediately while a background task refetches; otherwise
    /// the call waits for the fetch, retries included.
    pub async fn get(&self, key: &str) -> Result<Arc<Value>, FetchError> {
        if let Some(entry) = self.inner.fresh.get(key).await {
            tracing::debug!(key, "fetch cache hit");
            return Ok(entry.value);
        }

        if self.inner.config.keep_previous_data {
            if let Some(previous) = self.inner.previous.get(key).await {
                tracing::debug!(key, "serving previous value while refetching");
                self.refresh_in_background(key);
                return Ok(previous.value);
            }
        }

        self.inner.load(key).await
    }

    /// Read a resource and deserialize it
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, FetchError> {
        let value = self.get(key).await?;
        T::deserialize(value.as_ref()).map_err(|e| FetchError::decode(key, e))
    }

    /// Last good value for `key`, if any
    ///
    /// With keep-previous-data disabled this only reports values still
    /// inside their dedupe window.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        if self.inner.config.keep_previous_data {
            self.inner.previous.get(key).await
        } else {
            self.inner.fresh.get(key).await
        }
    }

    /// Whether a background refetch of `key` is running
    #[must_use]
    pub fn is_refreshing(&self, key: &str) -> bool {
        self.inner.refreshing.contains(key)
    }

    /// Force a refetch of `key`, ignoring the dedupe window, and wait for it
    pub async fn revalidate(&self, key: &str) -> Result<Arc<Value>, FetchError> {
        self.inner.fresh.invalidate(key).await;
        if !self.inner.config.keep_previous_data {
            self.inner.previous.invalidate(key).await;
        }
        self.inner.load(key).await
    }

    /// Window regained focus; returns the number of keys refetched
    pub async fn on_focus(&self) -> usize {
        if !self.inner.config.revalidate_on_focus {
            return 0;
        }
        self.revalidate_known().await
    }

    /// Connectivity returned; returns the number of keys refetched
    pub async fn on_reconnect(&self) -> usize {
        if !self.inner.config.revalidate_on_reconnect {
            return 0;
        }
        self.revalidate_known().await
    }

    /// Current statistics
    pub async fn stats(&self) -> CacheStats {
        self.inner.fresh.run_pending_tasks().await;
        self.inner.previous.run_pending_tasks().await;
        CacheStats {
            entry_count: self.inner.fresh.entry_count(),
            known_keys: self.inner.previous.entry_count(),
            fetch_attempts: self.inner.attempts.load(Ordering::Relaxed),
        }
    }

    fn refresh_in_background(&self, key: &str) {
        if !self.inner.refreshing.insert(key.to_string()) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        tokio::spawn(async move {
            if let Err(e) = inner.load(&key).await {
                tracing::warn!(key = %key, error = %e, "background refetch failed, keeping previous value");
            }
            inner.refreshing.remove(&key);
        });
    }

    async fn revalidate_known(&self) -> usize {
        let keys: Vec<String> = self
            .inner
            .previous
            .iter()
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        let mut refreshed = 0;
        for key in keys {
            match self.revalidate(&key).await {
                Ok(_) => refreshed += 1,
                Err(e) => tracing::warn!(key = %key, error = %e, "revalidation failed"),
            }
        }
        refreshed
    }
}

impl Inner {
    /// Fetch through the dedupe cache, coalescing with any in-flight fetch
    async fn load(&self, key: &str) -> Result<Arc<Value>, FetchError> {
        self.fresh
            .try_get_with(key.to_string(), self.fetch_with_retry(key))
            .await
            .map(|entry| entry.value)
            .map_err(|e| FetchError::clone(&e))
    }

    async fn fetch_with_retry(&self, key: &str) -> Result<CacheEntry, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            match self.fetcher.fetch(key).await {
                Ok(value) => {
                    let entry = CacheEntry {
                        value: Arc::new(value),
                        fetched_at: Utc::now(),
                    };
                    self.previous.insert(key.to_string(), entry.clone()).await;
                    return Ok(entry);
                }
                Err(e) if attempt < self.config.error_retry_count => {
                    attempt += 1;
                    tracing::warn!(key, attempt, error = %e, "fetch failed, retrying");
                    tokio::time::sleep(self.config.error_retry_interval).await;
                }
                Err(e) => {
                    tracing::error!(key, error = %e, "fetch failed, retries exhausted");
                    return Err(e);
                }
            }
        }
    }
}
