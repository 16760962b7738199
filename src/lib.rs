//! webcache - A static content server backed by a bounded LRU cache
//!
//! Files are served through an in-memory LRU cache. Saving a file marks its
//! cached copy dirty so the next read refreshes it from disk.

pub mod api;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{Cache, CacheEntry, PutOutcome};
pub use config::Config;
pub use error::{CacheError, Result};
