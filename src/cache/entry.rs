//! Cache Entry Module
//!
//! Defines the unit of storage held by the cache: a key, a content-type tag,
//! an owned byte buffer and the dirty flag used to request a refresh.

use crate::error::{CacheError, Result};

#[cfg(test)]
use std::cell::Cell;

// == Cache Entry ==
/// A single cached item.
///
/// The buffer length is the content length; there is no separate counter
/// that could drift from it. Recency links are held by the list node that
/// owns the entry, not by the entry itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Lookup key (a resolved file path in the content server)
    key: String,
    /// Opaque tag describing the payload, e.g. a MIME type
    content_type: String,
    /// Cached payload
    content: Vec<u8>,
    /// Set by callers when the source of truth has changed
    dirty: bool,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a clean entry holding owned copies of all three buffers.
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` or `content_type` is empty
    /// - `Allocation` if any buffer cannot be reserved; buffers copied so
    ///   far are released before returning
    pub fn new(key: &str, content_type: &str, content: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key cannot be empty".to_string()));
        }
        if content_type.is_empty() {
            return Err(CacheError::InvalidArgument(
                "content type cannot be empty".to_string(),
            ));
        }

        let key = copy_str(key)?;
        let content_type = copy_str(content_type)?;
        let content = copy_bytes(content)?;

        Ok(Self {
            key,
            content_type,
            content,
            dirty: false,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Exact byte length of the cached payload.
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // == Mark Dirty ==
    /// Flags the entry as stale. The next `put` for this key replaces the
    /// content instead of ignoring it.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // == Refresh ==
    /// Replaces the payload and clears the dirty flag.
    ///
    /// The new buffer is allocated before the old one is released, so a
    /// failed reservation leaves the entry untouched (still dirty).
    pub(crate) fn refresh(&mut self, content: &[u8]) -> Result<()> {
        let fresh = copy_bytes(content)?;
        self.content = fresh;
        self.dirty = false;
        Ok(())
    }
}

// == Fallible Copies ==
fn copy_str(src: &str) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(src.len())?;
    out.push_str(src);
    Ok(out)
}

fn copy_bytes(src: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(payload_reservation(src.len()))?;
    out.extend_from_slice(src);
    Ok(out)
}

fn payload_reservation(len: usize) -> usize {
    #[cfg(test)]
    let len = if FAIL_PAYLOAD_RESERVE.with(Cell::get) {
        usize::MAX
    } else {
        len
    };
    len
}

#[cfg(test)]
thread_local! {
    static FAIL_PAYLOAD_RESERVE: Cell<bool> = const { Cell::new(false) };
}

/// Makes every payload reservation on the current thread overflow until
/// switched off again.
#[cfg(test)]
pub(crate) fn fail_payload_reservations(enabled: bool) {
    FAIL_PAYLOAD_RESERVE.with(|flag| flag.set(enabled));
}
