//! Cache Module
//!
//! Side cache for the catalog: a `Cache` trait with an in-process backend
//! (TTL expiration plus LRU eviction) and a Redis backend.

mod entry;
mod keys;
mod memory;
mod redis_impl;
mod stats;
mod store;


use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

// Re-export public types
pub use entry::CacheEntry;
pub use keys::{CacheKeys, DEFAULT_PREFIX};
pub use memory::MemoryCache;
pub use redis_impl::RedisCache;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// TTL applied to every entry populated on a read miss
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

// == Cache Error ==
/// Errors raised by a cache client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Invalid cache entry: {0}")]
    InvalidEntry(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Cache Trait ==
/// Key-value client used by the cache-aside repositories.
///
/// Values are JSON text. The TTL is fixed when a value is written; reading an
/// entry never extends it.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value by key. Missing and expired entries are both `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Removes a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}
