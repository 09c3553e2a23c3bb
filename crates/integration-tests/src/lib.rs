//! Integration tests for Tote.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tote-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart hydration and write-through on disk
//! - `favourites_persistence` - Favourites hydration and write-through on disk
//!
//! Each test gets its own temporary data directory. "Restarting the process"
//! means dropping every store and opening new ones over the same directory.

use rust_decimal::Decimal;
use tempfile::TempDir;
use tote_core::{CartItem, Product, ProductId, Quantity};
use tote_storefront::storage::FileStorage;

/// A scratch data directory that is deleted on drop.
pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    /// Create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Fresh storage handle, as a newly started process would build.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.dir.path())
    }

    /// Raw contents stored under `key`, if any.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(format!("{key}.json"))).ok()
    }

    /// Overwrite the raw contents stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, key: &str, contents: &str) {
        std::fs::write(self.dir.path().join(format!("{key}.json")), contents)
            .expect("Failed to write storage file");
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A product with a numeric id and a price in cents.
///
/// # Panics
///
/// Panics on a negative price.
#[must_use]
pub fn product(id: i64, cents: i64) -> Product {
    Product::new(ProductId::from(id), format!("Product {id}"), Decimal::new(cents, 2))
        .expect("valid product")
}

/// A cart line for [`product`].
///
/// # Panics
///
/// Panics on a zero quantity or negative price.
#[must_use]
pub fn cart_item(id: i64, cents: i64, quantity: u32) -> CartItem {
    CartItem::new(product(id, cents), Quantity::new(quantity).expect("positive quantity"))
}
