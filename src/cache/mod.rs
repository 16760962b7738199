//! Cache Module
//!
//! Bounded in-memory LRU cache with exact recency order and a dirty-flag
//! refresh protocol.

mod entry;
mod index;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use index::{HashIndex, MapIndex, DEFAULT_INDEX_CAPACITY};
pub use lru::{EntryId, IntoEntries, Iter, RecencyList};
pub use stats::CacheStats;
pub use store::{Cache, PutOutcome};
