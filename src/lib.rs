//! Swift-Cart catalog service
//!
//! Products, categories and attributes served over a JSON API. Product and
//! category reads go through a cache-aside layer in front of the store; the
//! cache is Redis or a bounded in-process map with TTL and LRU eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod repository;
pub mod slug;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
pub use tasks::spawn_cleanup_task;
