//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! dirty-entry refreshes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries dropped from the tail to stay within capacity
    pub evictions: u64,
    /// Dirty entries whose content was replaced by `put`
    pub refreshes: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    /// Counts a `get` that found its key.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a `get` that found nothing.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts an entry removed from the tail.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Counts a dirty entry whose content was replaced.
    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    // == Entry Count ==
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
