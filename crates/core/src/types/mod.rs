//! Core types for Tote.
//!
//! This module provides type-safe wrappers for the line items held by the
//! cart and favourites stores.

pub mod id;
pub mod line_item;
pub mod price;
pub mod quantity;

pub use id::ProductId;
pub use line_item::{CartItem, LineItemError, MAX_PRICE, Product};
pub use price::{CurrencyCode, Price, UnknownCurrency};
pub use quantity::Quantity;
