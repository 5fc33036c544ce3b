//! Response DTOs for the catalog API
//!
//! Every endpoint answers with the same `{ success, data, error? }` envelope.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Database,
}

/// Uniform response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            source: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            source: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub populates: u64,
    pub invalidations: u64,
    pub errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Live keys in the memory cache; absent for Redis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
    /// LRU evictions in the memory cache; absent for Redis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evictions: Option<u64>,
}

impl StatsResponse {
    pub fn new(snapshot: StatsSnapshot, entries: Option<usize>) -> Self {
        Self::with_evictions(snapshot, entries, None)
    }

    pub fn with_evictions(
        snapshot: StatsSnapshot,
        entries: Option<usize>,
        evictions: Option<u64>,
    ) -> Self {
        Self {
            hits: snapshot.hits,
            misses: snapshot.misses,
            populates: snapshot.populates,
            invalidations: snapshot.invalidations,
            errors: snapshot.errors,
            hit_rate: snapshot.hit_rate(),
            entries,
            evictions,
        }
    }
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
