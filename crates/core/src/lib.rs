//! Tote Core - Shared types library.
//!
//! This crate provides the line item types used across all Tote components:
//! - `storefront` - Cart and favourites stores with durable persistence
//! - `cli` - Command-line front end over the stores
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, quantities, prices and validated line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
