//! Cache Store Module
//!
//! In-process cache engine: an LRU map of entries with write-time TTLs.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;

use crate::cache::{CacheEntry, CacheError, Result, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Cache Store ==
/// Bounded key-value storage with LRU eviction and TTL expiry.
#[derive(Debug)]
pub struct CacheStore {
    entries: LruCache<String, CacheEntry>,
    evictions: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` keys (minimum one).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            evictions: 0,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry and its expiry.
    ///
    /// When the store is full the least recently used key is evicted.
    pub fn set(&mut self, key: &str, value: String, ttl: Duration) -> Result<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidEntry(format!(
                "Key must be 1 to {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidEntry(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let is_overwrite = self.entries.contains(key);
        let displaced = self
            .entries
            .push(key.to_string(), CacheEntry::new(value, ttl));

        if !is_overwrite && displaced.is_some() {
            self.evictions += 1;
        }

        Ok(())
    }

    // == Get ==
    /// Returns the value if present and not expired.
    ///
    /// Expired entries are dropped on the way out. A read marks the key as
    /// recently used but leaves its expiry untouched.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.pop(key);
        }
        None
    }

    // == Delete ==
    /// Removes a key, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    // == TTL ==
    /// Remaining lifetime of a live entry, without touching LRU order.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .peek(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.pop(key);
        }

        expired_keys.len()
    }

    /// Number of keys displaced by LRU eviction so far.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
