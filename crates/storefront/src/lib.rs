//! Tote Storefront library.
//!
//! Client-side cart and favourites stores. Each store keeps an ordered,
//! id-unique collection in memory, writes the whole collection to durable
//! key-value storage after every mutation, and hydrates from that storage
//! when opened.
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tote_core::{CartItem, Product, ProductId, Quantity};
//! use tote_storefront::cart::CartStore;
//! use tote_storefront::storage::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let mut cart = CartStore::open(storage.clone());
//!
//! let tee = Product::new(ProductId::from(1), "Tee", Decimal::from(10)).unwrap();
//! cart.add_item(CartItem::new(tee.clone(), Quantity::new(2).unwrap()));
//! cart.add_item(CartItem::new(tee, Quantity::new(3).unwrap()));
//!
//! assert_eq!(cart.total_items(), 5);
//! assert_eq!(cart.total_amount(), Decimal::from(50));
//!
//! // A fresh store over the same storage sees the same cart
//! assert_eq!(CartStore::open(storage).total_items(), 5);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod collection;
pub mod config;
pub mod error;
pub mod favourites;
pub mod state;
pub mod storage;
pub mod view;

pub use cart::{CartStore, CartTotals};
pub use collection::CollectionState;
pub use config::StoreConfig;
pub use error::StoreError;
pub use favourites::{FavouritesStore, Toggle};
pub use state::AppState;
