//! Recency List Module
//!
//! Doubly-linked list of cache entries ordered by access time, stored in an
//! arena and linked by index handles.
//!
//! - Head = Most recently used
//! - Tail = Least recently used

use crate::cache::CacheEntry;
use crate::error::Result;

// == Entry Handle ==
/// Stable handle to an entry held by a [`RecencyList`].
///
/// A handle stays valid until its entry leaves the list; the slot may then be
/// reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

// == Recency List ==
/// Owns every entry in the cache and keeps them in exact recency order.
///
/// All operations are O(1). Links are indices into `nodes`, so unlinking
/// can never leave a dangling reference to a released entry.
#[derive(Debug, Default)]
pub struct RecencyList {
    nodes: Vec<Option<Node>>,
    /// Vacant slots. Capacity is kept >= `nodes.len()` so releasing a slot
    /// never allocates.
    free: Vec<usize>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert Head ==
    /// Takes ownership of `entry` and links it as the most recently used.
    ///
    /// Fails with `Allocation` if no slot can be reserved, in which case the
    /// list is unchanged and the entry is dropped.
    pub fn insert_head(&mut self, entry: CacheEntry) -> Result<EntryId> {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.nodes.try_reserve(1)?;
                self.free.try_reserve(self.nodes.len() + 1)?;
                self.nodes.push(None);
                self.nodes.len() - 1
            }
        };

        let id = EntryId(slot);
        self.nodes[slot] = Some(Node {
            entry,
            prev: None,
            next: None,
        });
        self.link_head(id);
        self.len += 1;

        Ok(id)
    }

    // == Move To Head ==
    /// Marks an entry as most recently used. No-op if it is already the head
    /// or the handle is vacant.
    pub fn move_to_head(&mut self, id: EntryId) {
        if self.head == Some(id) || self.node(id).is_none() {
            return;
        }

        self.unlink(id);
        self.link_head(id);
    }

    // == Remove Tail ==
    /// Detaches and returns the least recently used entry.
    ///
    /// Ownership passes to the caller; the entry is not dropped here.
    /// Returns None if the list is empty.
    pub fn remove_tail(&mut self) -> Option<CacheEntry> {
        let id = self.tail?;
        self.remove(id)
    }

    // == Remove ==
    /// Detaches and returns the entry behind `id`, wherever it sits.
    pub fn remove(&mut self, id: EntryId) -> Option<CacheEntry> {
        self.node(id)?;
        self.unlink(id);

        let node = self.nodes.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;

        Some(node.entry)
    }

    pub fn get(&self, id: EntryId) -> Option<&CacheEntry> {
        self.node(id).map(|node| &node.entry)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut CacheEntry> {
        self.node_mut(id).map(|node| &mut node.entry)
    }

    /// Handle of the most recently used entry.
    pub fn head(&self) -> Option<EntryId> {
        self.head
    }

    /// Handle of the least recently used entry.
    pub fn tail(&self) -> Option<EntryId> {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Consumes the list, yielding owned entries from head to tail.
    pub fn into_entries(self) -> IntoEntries {
        IntoEntries {
            cursor: self.head,
            nodes: self.nodes,
        }
    }

    // == Link Helpers ==
    fn node(&self, id: EntryId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: EntryId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Closes the gap around `id`, fixing head/tail when it sat at either end.
    fn unlink(&mut self, id: EntryId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    /// Links a detached node in front of the current head.
    fn link_head(&mut self, id: EntryId) {
        let old_head = self.head;

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_id) => {
                if let Some(head_node) = self.node_mut(head_id) {
                    head_node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }

        self.head = Some(id);
    }
}

// == Iterators ==
/// Borrowing iterator, most recently used first.
pub struct Iter<'a> {
    list: &'a RecencyList,
    cursor: Option<EntryId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CacheEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.entry)
    }
}

/// Owning iterator, most recently used first.
pub struct IntoEntries {
    nodes: Vec<Option<Node>>,
    cursor: Option<EntryId>,
}

impl Iterator for IntoEntries {
    type Item = CacheEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get_mut(self.cursor?.0)?.take()?;
        self.cursor = node.next;
        Some(node.entry)
    }
}
