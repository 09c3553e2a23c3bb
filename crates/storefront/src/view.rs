//! Display models for presentation layers.
//!
//! Views are plain snapshots: formatted strings and counts, built from a
//! store and a display currency. They hold no reference back to the store.

use serde::Serialize;
use tote_core::{CartItem, CurrencyCode, Price, Product};

use crate::cart::CartStore;
use crate::favourites::FavouritesStore;
use crate::storage::Storage;

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub original_price: Option<String>,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

/// Favourite product display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavouriteView {
    pub id: String,
    pub name: String,
    pub variant: Option<String>,
    pub price: String,
    pub image: Option<String>,
}

/// Favourites display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavouritesView {
    pub items: Vec<FavouriteView>,
    pub count: usize,
}

impl CartView {
    /// Snapshot `cart` for display.
    #[must_use]
    pub fn from_store<S: Storage>(cart: &CartStore<S>, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .items()
                .map(|item| CartItemView::new(item, currency))
                .collect(),
            subtotal: Price::new(cart.total_amount(), currency).display(),
            item_count: cart.total_items(),
        }
    }
}

impl CartItemView {
    fn new(item: &CartItem, currency: CurrencyCode) -> Self {
        let product = item.product();
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            variant: variant_label(product),
            quantity: item.quantity().get(),
            price: Price::new(product.price(), currency).display(),
            original_price: product
                .original_price()
                .map(|amount| Price::new(amount, currency).display()),
            line_price: Price::new(item.line_total(), currency).display(),
            image: product.image().map(String::from),
        }
    }
}

impl FavouritesView {
    /// Snapshot `favourites` for display.
    #[must_use]
    pub fn from_store<S: Storage>(favourites: &FavouritesStore<S>, currency: CurrencyCode) -> Self {
        Self {
            items: favourites
                .items()
                .map(|product| FavouriteView {
                    id: product.id().to_string(),
                    name: product.name().to_string(),
                    variant: variant_label(product),
                    price: Price::new(product.price(), currency).display(),
                    image: product.image().map(String::from),
                })
                .collect(),
            count: favourites.total_items(),
        }
    }
}

/// "M / Black" style label from size and colour, if either is set.
fn variant_label(product: &Product) -> Option<String> {
    match (product.size(), product.color()) {
        (Some(size), Some(color)) => Some(format!("{size} / {color}")),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}
