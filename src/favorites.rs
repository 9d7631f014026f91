//! The user's favorites: an ordered, de-duplicated list of feed items.
//!
//! The store owns its persistence.  Every mutating operation writes the full
//! collection back to the key-value store before returning; a failed write is
//! logged and the in-memory state is kept, so at worst the latest change is
//! lost on the next start.

use std::sync::Arc;

use crate::source::{FeedItem, ItemKey};
use crate::storage::{KeyValueStore, FAVORITES_KEY};

pub struct FavoritesStore {
    items: Vec<FeedItem>,
    storage: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    /// An empty collection backed by `storage`.  Nothing is read.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            items: Vec::new(),
            storage,
        }
    }

    /// Create the store and hydrate it from the persisted snapshot.
    ///
    /// Missing or malformed data yields an empty collection; the parse error
    /// is logged, never returned.
    pub fn hydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let snapshot = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<FeedItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored favorites are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored favorites, starting empty");
                Vec::new()
            }
        };

        // Hydration replaces, and is not itself a mutation worth writing back.
        let mut store = Self::new(storage);
        store.items = snapshot;
        tracing::info!(count = store.items.len(), "Loaded favorites");
        store
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &ItemKey) -> bool {
        self.items.iter().any(|item| item.key() == *key)
    }

    /// Append `item` unless an item with the same key is already present.
    pub fn add(&mut self, item: FeedItem) {
        if self.items.iter().any(|existing| existing.same_item(&item)) {
            return;
        }
        self.items.push(item);
        self.persist();
    }

    /// Remove the item with `key`.  Absent keys are a no-op.
    pub fn remove(&mut self, key: &ItemKey) {
        let before = self.items.len();
        self.items.retain(|item| item.key() != *key);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Remove `item` if it is a favorite, add it otherwise.  Returns whether
    /// it is a favorite afterwards.
    pub fn toggle(&mut self, item: &FeedItem) -> bool {
        let key = item.key();
        if self.contains(&key) {
            self.remove(&key);
            false
        } else {
            self.add(item.clone());
            true
        }
    }

    /// Replace the collection with `items`, in that order.
    ///
    /// `items` is expected to be a permutation of the current collection;
    /// this is not checked.  Callers other than [`move_item`](Self::move_item)
    /// must validate it themselves.
    pub fn reorder(&mut self, items: Vec<FeedItem>) {
        self.items = items;
        self.persist();
    }

    /// Move the entry at `from` to position `to`, shifting the others.
    /// Out-of-range indices are ignored.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.items.len() || to >= self.items.len() || from == to {
            return;
        }
        let mut next = self.items.clone();
        let item = next.remove(from);
        next.insert(to, item);
        self.reorder(next);
    }

    /// Replace the collection wholesale with `snapshot`.
    pub fn load_all(&mut self, snapshot: Vec<FeedItem>) {
        self.items = snapshot;
        self.persist();
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize favorites");
                return;
            }
        };
        if let Err(e) = self.storage.set(FAVORITES_KEY, &json) {
            tracing::warn!(error = %e, "Could not persist favorites");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
