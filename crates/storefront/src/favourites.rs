//! Favourites store.
//!
//! Same shape as the cart but membership is boolean: adding a product that
//! is already a favourite removes it. Callers must not assume the cart's
//! additive behaviour here.

use tote_core::{Product, ProductId};
use tracing::instrument;

use crate::collection::{CollectionState, PersistedCollection};
use crate::error::{self, add_breadcrumb};
use crate::storage::Storage;

/// Default storage key for favourites.
pub const FAVOURITES_KEY: &str = "favourite";

/// Outcome of [`FavouritesStore::add_favourite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The product was appended.
    Added,
    /// The product was already a favourite and has been removed.
    Removed,
}

/// The shopper's saved products.
#[derive(Debug)]
pub struct FavouritesStore<S> {
    products: PersistedCollection<S, Product>,
}

impl<S: Storage> FavouritesStore<S> {
    /// Open favourites stored under [`FAVOURITES_KEY`].
    #[must_use]
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, FAVOURITES_KEY)
    }

    /// Open favourites stored under `key`.
    #[instrument(skip(storage))]
    pub fn open_with_key(storage: S, key: &str) -> Self {
        let products = PersistedCollection::hydrate(storage, key, keep_first);
        tracing::debug!(key, favourites = products.len(), "Opened favourites");
        Self { products }
    }

    /// Toggle `product`: append it if absent, remove it if present.
    pub fn add_favourite(&mut self, product: Product) -> Toggle {
        let id = product.id().clone();
        let outcome = if self.products.remove(&id).is_some() {
            Toggle::Removed
        } else {
            self.products.push(product);
            Toggle::Added
        };

        tracing::debug!(product_id = %id, ?outcome, "Toggled favourite");
        add_breadcrumb(
            "favourites",
            "Toggled favourite",
            &[("product_id", id.to_string()), ("outcome", format!("{outcome:?}"))],
        );
        self.products.write_through();
        outcome
    }

    /// Remove `id` from favourites. Does nothing if absent.
    pub fn remove_favourite(&mut self, id: &ProductId) {
        if self.products.remove(id).is_some() {
            tracing::debug!(product_id = %id, "Removed favourite");
            add_breadcrumb("favourites", "Removed favourite", &[("product_id", id.to_string())]);
        }
        self.products.write_through();
    }

    /// Remove every favourite.
    pub fn clear_favourites(&mut self) {
        self.products.clear();
        tracing::debug!(key = self.products.key(), "Cleared favourites");
        add_breadcrumb("favourites", "Cleared favourites", &[]);
        self.products.write_through();
    }

    /// Discard in-memory favourites and hydrate again from storage.
    pub fn reload(&mut self) {
        self.products.reload(keep_first);
    }

    /// Write favourites to storage now, returning any failure.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the storage write fails.
    pub fn persist(&self) -> error::Result<()> {
        self.products.persist()
    }

    /// Favourites in the order they were added.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &Product> + DoubleEndedIterator {
        self.products.values()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Whether `id` is currently a favourite.
    #[must_use]
    pub fn is_favourite(&self, id: &ProductId) -> bool {
        self.products.contains(id)
    }

    /// Number of favourites.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.products.state()
    }

    /// The storage backend these favourites write to.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.products.storage()
    }
}

fn keep_first(_existing: &mut Product, _duplicate: Product) {}
