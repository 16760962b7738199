//! Content Module
//!
//! Filesystem access and MIME lookup for the files served through the cache.

pub mod files;
pub mod mime;

pub use mime::mime_type_for;
