//! Hash Index Module
//!
//! Narrow key → handle lookup used by the cache. Any exact-match associative
//! container can back it; the default is a `HashMap`.

use std::collections::HashMap;

use crate::cache::EntryId;
use crate::error::Result;

/// Capacity reserved when the caller passes a size hint of 0.
pub const DEFAULT_INDEX_CAPACITY: usize = 128;

// == Hash Index Trait ==
/// Maps keys to the handles of the entries that own them.
///
/// The index stores handles only; dropping it never drops cache entries.
pub trait HashIndex: Sized {
    /// Builds an index sized for `hint` keys (0 = implementation default).
    fn with_size_hint(hint: usize) -> Result<Self>;

    /// Inserts or overwrites the mapping for `key`.
    ///
    /// On `Allocation` failure the index is unchanged.
    fn insert(&mut self, key: &str, id: EntryId) -> Result<()>;

    fn get(&self, key: &str) -> Option<EntryId>;

    /// Removes the mapping for `key`; no-op if absent.
    fn remove(&mut self, key: &str);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Map Index ==
/// `HashMap`-backed index.
#[derive(Debug, Default)]
pub struct MapIndex {
    map: HashMap<String, EntryId>,
}

impl HashIndex for MapIndex {
    fn with_size_hint(hint: usize) -> Result<Self> {
        let capacity = if hint == 0 {
            DEFAULT_INDEX_CAPACITY
        } else {
            hint
        };

        let mut map = HashMap::new();
        map.try_reserve(capacity)?;
        Ok(Self { map })
    }

    fn insert(&mut self, key: &str, id: EntryId) -> Result<()> {
        self.map.try_reserve(1)?;
        let mut owned = String::new();
        owned.try_reserve_exact(key.len())?;
        owned.push_str(key);
        self.map.insert(owned, id);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<EntryId> {
        self.map.get(key).copied()
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
