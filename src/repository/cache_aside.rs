//! Cache-aside read path and write-side invalidation.
//!
//! The repository, not the cache, owns population and invalidation:
//!
//! - **Reads**: look up the key; a hit is terminal. On a miss, load from the
//!   store and write the value back with a write-time TTL.
//! - **Writes**: the caller commits to the store first, then deletes every
//!   affected key. Keys are deleted, never refreshed, so the next read is a
//!   deterministic miss.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::cache::{Cache, CacheError, CacheStats, DEFAULT_TTL};
use crate::error::{AppError, Result};
use crate::models::Source;

/// What to do when the cache client itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheFailurePolicy {
    /// Fail the request with the cache error.
    #[default]
    Fail,
    /// Log the error and answer from the store alone.
    Bypass,
}

impl FromStr for CacheFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "bypass" => Ok(Self::Bypass),
            other => Err(format!("unknown cache failure policy `{}`", other)),
        }
    }
}

/// A value plus where it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

/// Shared cache-aside mechanics for every cached entity kind.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn Cache>,
    ttl: Duration,
    policy: CacheFailurePolicy,
    stats: Arc<CacheStats>,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            ttl: DEFAULT_TTL,
            policy: CacheFailurePolicy::default(),
            stats: Arc::new(CacheStats::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_policy(mut self, policy: CacheFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    /// Read-through for a single entity.
    ///
    /// `Ok(None)` means the store has no such entity; nothing is cached then.
    pub async fn fetch<T, F, Fut, E>(&self, key: &str, load: F) -> Result<Option<Fetched<T>>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<Option<T>, E>> + Send,
        AppError: From<E>,
    {
        if let Some(value) = self.lookup::<T>(key).await? {
            self.stats.record_hit();
            tracing::trace!(key = %key, "Cache hit");
            return Ok(Some(Fetched {
                value,
                source: Source::Cache,
            }));
        }

        self.stats.record_miss();
        tracing::trace!(key = %key, "Cache miss");

        let Some(value) = load().await? else {
            return Ok(None);
        };
        self.populate(key, &value).await?;

        Ok(Some(Fetched {
            value,
            source: Source::Database,
        }))
    }

    /// Read-through for a whole collection; an empty collection is cached too.
    pub async fn fetch_collection<T, F, Fut, E>(&self, key: &str, load: F) -> Result<Fetched<Vec<T>>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<Vec<T>, E>> + Send,
        AppError: From<E>,
    {
        let fetched = self
            .fetch(key, || async move { load().await.map(Some) })
            .await?;

        Ok(fetched.unwrap_or(Fetched {
            value: Vec::new(),
            source: Source::Database,
        }))
    }

    /// Deletes every key. All deletions are attempted even if one fails.
    pub async fn invalidate(&self, keys: &[String]) -> Result<()> {
        let mut first_error = None;

        for key in keys {
            match self.cache.delete(key).await {
                Ok(()) => {
                    self.stats.record_invalidation();
                    tracing::debug!(key = %key, "Cache key invalidated");
                }
                Err(err) => {
                    if let Err(e) = self.cache_failed(key, err, "invalidate") {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw,
            Err(err) => {
                self.cache_failed(key, err, "read")?;
                None
            }
        };

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                // Undecodable entries are treated as a miss and overwritten
                tracing::warn!(key = %key, error = %err, "Cache entry deserialization failed");
                Ok(None)
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache entry serialization failed");
                return Ok(());
            }
        };

        match self.cache.set(key, &raw, self.ttl).await {
            Ok(()) => {
                self.stats.record_populate();
                Ok(())
            }
            // The cache refused this value (e.g. over its size limit); serve it uncached
            Err(CacheError::InvalidEntry(reason)) => {
                tracing::warn!(key = %key, reason = %reason, "Value not cacheable, skipping populate");
                Ok(())
            }
            Err(err) => self.cache_failed(key, err, "populate"),
        }
    }

    fn cache_failed(&self, key: &str, err: CacheError, operation: &'static str) -> Result<()> {
        self.stats.record_error();
        match self.policy {
            CacheFailurePolicy::Fail => Err(AppError::Cache(err)),
            CacheFailurePolicy::Bypass => {
                tracing::warn!(key = %key, operation, error = %err, "Cache unavailable, bypassing");
                Ok(())
            }
        }
    }
}
