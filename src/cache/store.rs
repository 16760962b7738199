//! Cache Store Module
//!
//! Bounded LRU cache combining a hash index with the recency list, plus the
//! dirty-flag refresh protocol used by the content server.

use crate::cache::lru::Iter;
use crate::cache::{CacheEntry, CacheStats, EntryId, HashIndex, MapIndex, RecencyList};
use crate::error::{CacheError, Result};

// == Put Outcome ==
/// What a call to [`Cache::put`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// Key was absent and a new entry was stored. Carries the entry pushed
    /// out of the tail, if the insertion went over capacity.
    Inserted { evicted: Option<CacheEntry> },
    /// Key was present and dirty; its content was replaced.
    Refreshed,
    /// Key was present and clean; only its recency changed.
    Unchanged,
}

// == Cache ==
/// Bounded LRU cache.
///
/// Every key in the index maps to exactly one entry in the recency list and
/// vice versa. The entry count never exceeds `max_size` once a public call
/// returns.
///
/// Not synchronized; callers sharing one cache must serialize access.
#[derive(Debug)]
pub struct Cache<I: HashIndex = MapIndex> {
    /// Key → handle lookup
    index: I,
    /// Owns the entries, most recently used first
    list: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
}

impl Cache<MapIndex> {
    // == Constructor ==
    /// Creates a cache backed by the default `HashMap` index.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries, must be > 0
    /// * `index_hint` - Index sizing hint, 0 selects the index default
    pub fn new(max_size: usize, index_hint: usize) -> Result<Self> {
        Self::with_index(max_size, index_hint)
    }
}

impl<I: HashIndex> Cache<I> {
    /// Creates a cache backed by any [`HashIndex`] implementation.
    ///
    /// Nothing is returned unless both the index and the cache are built.
    pub fn with_index(max_size: usize, index_hint: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(CacheError::InvalidArgument(
                "max_size must be greater than 0".to_string(),
            ));
        }

        let index = I::with_size_hint(index_hint)?;

        Ok(Self {
            index,
            list: RecencyList::new(),
            stats: CacheStats::new(),
            max_size,
        })
    }

    // == Get ==
    /// Looks up an entry and marks it most recently used.
    ///
    /// The returned reference allows callers to flag the entry dirty.
    /// A miss (or an empty key) leaves the cache untouched.
    pub fn get(&mut self, key: &str) -> Option<&mut CacheEntry> {
        if key.is_empty() {
            return None;
        }

        match self.touch(key) {
            Some(id) => {
                self.stats.record_hit();
                self.list.get_mut(id)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores content under `key`, evicting the least recently used entry
    /// if the cache goes over capacity.
    ///
    /// An existing entry is promoted. Its content is replaced only if it
    /// was marked dirty; a clean entry keeps its current content even when
    /// `content` differs. The content type of an existing entry is never
    /// changed.
    ///
    /// # Errors
    /// - `InvalidArgument` if `key` or `content_type` is empty
    /// - `Allocation` if the entry, its buffers or its index slot cannot be
    ///   reserved; no entry is added in that case
    pub fn put(&mut self, key: &str, content_type: &str, content: &[u8]) -> Result<PutOutcome> {
        if key.is_empty() {
            return Err(CacheError::InvalidArgument("key cannot be empty".to_string()));
        }
        if content_type.is_empty() {
            return Err(CacheError::InvalidArgument(
                "content type cannot be empty".to_string(),
            ));
        }

        if let Some(id) = self.touch(key) {
            let Some(entry) = self.list.get_mut(id) else {
                return Err(CacheError::Internal(format!(
                    "index points at a vacant slot for {}",
                    key
                )));
            };

            if !entry.is_dirty() {
                return Ok(PutOutcome::Unchanged);
            }

            entry.refresh(content)?;
            self.stats.record_refresh();
            return Ok(PutOutcome::Refreshed);
        }

        let entry = CacheEntry::new(key, content_type, content)?;
        let id = self.list.insert_head(entry)?;
        if let Err(err) = self.index.insert(key, id) {
            self.list.remove(id);
            return Err(err);
        }

        // At most one over: capacity held before this call and only one
        // entry was added.
        let evicted = if self.list.len() > self.max_size {
            self.evict_lru()
        } else {
            None
        };

        self.stats.set_total_entries(self.list.len());
        Ok(PutOutcome::Inserted { evicted })
    }

    // == Peek ==
    /// Returns an entry without changing its recency or the statistics.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry> {
        self.index.get(key).and_then(|id| self.list.get(id))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.get(key).is_some()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.list.len());
        stats
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        self.list.iter()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(CacheEntry::key)
    }

    // == Destroy ==
    /// Tears the cache down, releasing every entry.
    pub fn destroy(self) {
        self.destroy_with(drop);
    }

    /// Tears the cache down, handing each entry to `on_destroy` exactly once,
    /// most recently used first. The index is released before any entry.
    ///
    /// Returns the number of entries released.
    pub fn destroy_with<F>(self, mut on_destroy: F) -> usize
    where
        F: FnMut(CacheEntry),
    {
        let Self { index, list, .. } = self;
        drop(index);

        let mut released = 0;
        for entry in list.into_entries() {
            on_destroy(entry);
            released += 1;
        }
        released
    }

    // == Internal Helpers ==
    /// Index lookup plus promotion, without touching the statistics.
    fn touch(&mut self, key: &str) -> Option<EntryId> {
        let id = self.index.get(key)?;
        self.list.move_to_head(id);
        Some(id)
    }

    fn evict_lru(&mut self) -> Option<CacheEntry> {
        let evicted = self.list.remove_tail()?;
        self.index.remove(evicted.key());
        self.stats.record_eviction();
        Some(evicted)
    }

    /// Asserts that index and list agree on membership and that the size
    /// bound holds.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert!(self.list.len() <= self.max_size, "size bound violated");
        assert_eq!(self.index.len(), self.list.len(), "index/list size mismatch");
        for entry in self.list.iter() {
            let id = self
                .index
                .get(entry.key())
                .unwrap_or_else(|| panic!("{} missing from index", entry.key()));
            assert_eq!(self.list.get(id).map(CacheEntry::key), Some(entry.key()));
        }
    }
}
