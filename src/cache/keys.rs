//! Cache key layout.
//!
//! Keys are `{prefix}{kind}` for collections and `{prefix}{kind}:{id}` for
//! single entities.

/// Prefix shared by every key the storefront writes.
pub const DEFAULT_PREFIX: &str = "swift-cart:";

/// Builds cache keys under a fixed prefix.
#[derive(Debug, Clone)]
pub struct CacheKeys {
    prefix: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl CacheKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of the cached product collection.
    pub fn products(&self) -> String {
        format!("{}products", self.prefix)
    }

    /// Key of one cached product.
    pub fn product(&self, id: &str) -> String {
        format!("{}product:{}", self.prefix, id)
    }

    /// Key of the cached category collection.
    pub fn categories(&self) -> String {
        format!("{}categories:all", self.prefix)
    }

    /// Key of one cached category.
    ///
    /// Shares the `categories:` namespace with the collection, so the id
    /// `all` maps onto [`CacheKeys::categories`]. Store ids are UUIDs; a
    /// lookup of `all` reads the list, fails to decode it as a category,
    /// falls through to the store and answers not-found without writing.
    pub fn category(&self, id: &str) -> String {
        format!("{}categories:{}", self.prefix, id)
    }
}
