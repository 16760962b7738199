//! Response DTOs for the content server
//!
//! Defines the JSON bodies returned by the non-file endpoints.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for a successful file save (POST)
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    /// Always "ok"
    pub status: String,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of dirty entries refreshed
    pub refreshes: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Cache capacity
    pub max_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, max_entries: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            refreshes: stats.refreshes,
            total_entries: stats.total_entries,
            max_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
