//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_PREFIX;
use crate::images::CloudinaryConfig;
use crate::repository::CacheFailurePolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Redis connection URL; the in-process cache is used when unset
    pub redis_url: Option<String>,
    /// Lifetime of every populated cache entry, in seconds
    pub cache_ttl: u64,
    /// Namespace prepended to every cache key
    pub cache_key_prefix: String,
    /// Behavior when the cache itself errors
    pub cache_failure_policy: CacheFailurePolicy,
    /// Maximum entries held by the in-process cache
    pub max_entries: usize,
    /// In-process cache cleanup interval in seconds
    pub cleanup_interval: u64,
    /// Image host credentials; image uploads fail when unset
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REDIS_URL` - Redis URL (default: unset, in-process cache)
    /// - `CACHE_TTL` - Cache entry TTL in seconds (default: 3600)
    /// - `CACHE_KEY_PREFIX` - Key namespace (default: `swift-cart:`)
    /// - `CACHE_FAILURE_POLICY` - `fail` or `bypass` (default: fail)
    /// - `MAX_ENTRIES` - In-process cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET` -
    ///   image host credentials, all three required to enable uploads
    /// - `IMAGE_FOLDER_ROOT` - Root folder for uploads (default: `swift-cart`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            redis_url: non_empty_var("REDIS_URL"),
            cache_ttl: parse_var("CACHE_TTL")
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.cache_ttl),
            cache_key_prefix: non_empty_var("CACHE_KEY_PREFIX")
                .unwrap_or(defaults.cache_key_prefix),
            cache_failure_policy: parse_var("CACHE_FAILURE_POLICY")
                .unwrap_or(defaults.cache_failure_policy),
            max_entries: parse_var("MAX_ENTRIES")
                .filter(|max| *max > 0)
                .unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            cloudinary: cloudinary_from_env(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            redis_url: None,
            cache_ttl: 3600,
            cache_key_prefix: DEFAULT_PREFIX.to_string(),
            cache_failure_policy: CacheFailurePolicy::Fail,
            max_entries: 10_000,
            cleanup_interval: 60,
            cloudinary: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = non_empty_var(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}

fn cloudinary_from_env() -> Option<CloudinaryConfig> {
    let cloud_name = non_empty_var("CLOUDINARY_CLOUD_NAME")?;
    let api_key = non_empty_var("CLOUDINARY_API_KEY")?;
    let api_secret = non_empty_var("CLOUDINARY_API_SECRET")?;
    let folder_root = non_empty_var("IMAGE_FOLDER_ROOT").unwrap_or_else(|| "swift-cart".to_string());

    Some(CloudinaryConfig::new(cloud_name, api_key, api_secret, folder_root))
}
