//! Ordered, id-unique collection mirrored to durable storage.
//!
//! Shared plumbing for the cart and favourites stores. The collection owns
//! its storage handle and storage key; every mutation made through a store
//! ends with [`PersistedCollection::write_through`], which serializes the
//! whole collection as a JSON array under that key.
//!
//! # Hydration
//!
//! | Stored value                  | Result                               |
//! |-------------------------------|--------------------------------------|
//! | key absent                    | empty                                |
//! | storage read fails            | empty, `warn!`                       |
//! | not a JSON array              | empty, `warn!`                       |
//! | array with invalid elements   | invalid elements dropped, `warn!`    |
//! | array with duplicate ids      | resolved by the store's merge policy |

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tote_core::ProductId;

use crate::error::{self, StoreError};
use crate::storage::Storage;

/// An entry that can live in a [`PersistedCollection`].
pub trait Keyed: Serialize + DeserializeOwned {
    /// The product id this entry is unique by.
    fn product_id(&self) -> &ProductId;
}

impl Keyed for tote_core::CartItem {
    fn product_id(&self) -> &ProductId {
        self.id()
    }
}

impl Keyed for tote_core::Product {
    fn product_id(&self) -> &ProductId {
        self.id()
    }
}

/// Whether a store holds anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionState {
    /// No entries.
    Empty,
    /// At least one entry.
    Populated,
}

/// Insertion-ordered entries keyed by product id, plus where they persist.
#[derive(Debug)]
pub(crate) struct PersistedCollection<S, T> {
    storage: S,
    key: String,
    entries: IndexMap<ProductId, T>,
}

impl<S: Storage, T: Keyed> PersistedCollection<S, T> {
    /// Load the collection stored under `key`, degrading to empty.
    ///
    /// `merge` is called when a stored id appears more than once, with the
    /// entry kept so far and the later duplicate.
    pub(crate) fn hydrate(storage: S, key: &str, merge: impl Fn(&mut T, T)) -> Self {
        let entries = load_entries(&storage, key, merge);
        Self {
            storage,
            key: key.to_owned(),
            entries,
        }
    }

    /// Replace in-memory entries with whatever storage holds now.
    pub(crate) fn reload(&mut self, merge: impl Fn(&mut T, T)) {
        self.entries = load_entries(&self.storage, &self.key, merge);
    }

    /// Serialize every entry and write it under the collection's key.
    pub(crate) fn persist(&self) -> error::Result<()> {
        let items: Vec<&T> = self.entries.values().collect();
        let json = serde_json::to_string(&items)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }

    /// Persist, reporting (not returning) any failure.
    pub(crate) fn write_through(&self) {
        if let Err(err) = self.persist() {
            error::report_persist_failure(&self.key, &err);
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) const fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn get(&self, id: &ProductId) -> Option<&T> {
        self.entries.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &ProductId) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    pub(crate) fn contains(&self, id: &ProductId) -> bool {
        self.entries.contains_key(id)
    }

    /// Append a new entry. The caller has checked the id is absent.
    pub(crate) fn push(&mut self, entry: T) {
        self.entries.insert(entry.product_id().clone(), entry);
    }

    /// Remove an entry, keeping the order of the rest.
    pub(crate) fn remove(&mut self, id: &ProductId) -> Option<T> {
        self.entries.shift_remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn values(&self) -> indexmap::map::Values<'_, ProductId, T> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn state(&self) -> CollectionState {
        if self.entries.is_empty() {
            CollectionState::Empty
        } else {
            CollectionState::Populated
        }
    }
}

fn load_entries<S: Storage, T: Keyed>(
    storage: &S,
    key: &str,
    merge: impl Fn(&mut T, T),
) -> IndexMap<ProductId, T> {
    let mut entries = IndexMap::new();

    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return entries,
        Err(e) => {
            tracing::warn!(key, error = %e, "Storage unavailable, starting empty");
            return entries;
        }
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored collection is corrupt, starting empty");
            return entries;
        }
    };

    for (index, value) in values.into_iter().enumerate() {
        let entry: T = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, index, error = %e, "Dropping invalid stored entry");
                continue;
            }
        };

        match entries.entry(entry.product_id().clone()) {
            indexmap::map::Entry::Occupied(mut existing) => {
                tracing::warn!(key, product_id = %existing.key(), "Merging duplicate stored entry");
                merge(existing.get_mut(), entry);
            }
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }

    tracing::debug!(key, entries = entries.len(), "Hydrated collection");
    entries
}
