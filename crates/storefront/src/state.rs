//! Application state owned by the root of a session.
//!
//! There is exactly one cart and one favourites store per session. The root
//! scope builds an [`AppState`] and hands `&AppState` (reads) or
//! `&mut AppState` (mutations) to whatever needs it; there is no global.

use crate::cart::CartStore;
use crate::config::StoreConfig;
use crate::favourites::FavouritesStore;
use crate::storage::{FileStorage, Storage};
use crate::view::{CartView, FavouritesView};

/// Configuration plus both stores, sharing one storage backend.
#[derive(Debug)]
pub struct AppState<S> {
    config: StoreConfig,
    cart: CartStore<S>,
    favourites: FavouritesStore<S>,
}

impl<S: Storage + Clone> AppState<S> {
    /// Hydrate both stores from `storage` using the keys in `config`.
    #[must_use]
    pub fn new(config: StoreConfig, storage: S) -> Self {
        let cart = CartStore::open_with_key(storage.clone(), &config.cart_key);
        let favourites = FavouritesStore::open_with_key(storage, &config.favourites_key);
        Self {
            config,
            cart,
            favourites,
        }
    }
}

impl AppState<FileStorage> {
    /// Hydrate both stores from the configured data directory.
    #[must_use]
    pub fn from_config(config: StoreConfig) -> Self {
        let storage = FileStorage::new(&config.data_dir);
        tracing::info!(data_dir = %config.data_dir.display(), "Opening stores");
        Self::new(config, storage)
    }
}

impl<S: Storage> AppState<S> {
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    #[must_use]
    pub const fn favourites(&self) -> &FavouritesStore<S> {
        &self.favourites
    }

    pub const fn favourites_mut(&mut self) -> &mut FavouritesStore<S> {
        &mut self.favourites
    }

    /// Cart snapshot in the configured currency.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::from_store(&self.cart, self.config.currency)
    }

    /// Favourites snapshot in the configured currency.
    #[must_use]
    pub fn favourites_view(&self) -> FavouritesView {
        FavouritesView::from_store(&self.favourites, self.config.currency)
    }

    /// Re-read both stores from storage.
    pub fn reload(&mut self) {
        self.cart.reload();
        self.favourites.reload();
    }
}
