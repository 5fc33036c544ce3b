//! Cache-aside repositories.
//!
//! Each repository pairs a backing store with the shared cache. Handlers
//! talk only to these types; neither the store nor the cache is reachable
//! from the HTTP layer directly.

mod cache_aside;
mod categories;
mod products;

#[cfg(test)]
pub(crate) mod testing;

pub use cache_aside::{CacheAside, CacheFailurePolicy, Fetched};
pub use categories::CategoryRepository;
pub use products::ProductRepository;
