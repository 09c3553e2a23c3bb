//! Cart store.
//!
//! Holds the shopper's cart lines, mirrors them to storage after every
//! mutation, and keeps derived totals in step with the lines.
//!
//! # Semantics
//!
//! - Adding an id that is already in the cart adds to its quantity.
//! - Setting a quantity to zero or below removes the line.
//! - Removing or updating an id that is not in the cart does nothing.
//! - Totals are recomputed from scratch after every change; nothing is
//!   tracked incrementally.

use rust_decimal::Decimal;
use tote_core::{CartItem, ProductId, Quantity};
use tracing::instrument;

use crate::collection::{CollectionState, PersistedCollection};
use crate::error::{self, add_breadcrumb};
use crate::storage::Storage;

/// Default storage key for the cart.
pub const CART_KEY: &str = "cart";

/// Aggregates derived from the current cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of quantities.
    pub total_items: u64,
    /// Sum of `price * quantity`.
    pub total_amount: Decimal,
}

impl CartTotals {
    /// Compute totals over `items`. Both sums saturate instead of
    /// overflowing.
    pub fn compute<'a>(items: impl IntoIterator<Item = &'a CartItem>) -> Self {
        items.into_iter().fold(Self::default(), |acc, item| Self {
            total_items: acc
                .total_items
                .saturating_add(u64::from(item.quantity().get())),
            total_amount: acc
                .total_amount
                .checked_add(item.line_total())
                .unwrap_or(Decimal::MAX),
        })
    }
}

/// The shopper's cart.
#[derive(Debug)]
pub struct CartStore<S> {
    lines: PersistedCollection<S, CartItem>,
    totals: CartTotals,
}

impl<S: Storage> CartStore<S> {
    /// Open the cart stored under [`CART_KEY`].
    #[must_use]
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, CART_KEY)
    }

    /// Open the cart stored under `key`.
    ///
    /// Missing or unreadable data yields an empty cart.
    #[instrument(skip(storage))]
    pub fn open_with_key(storage: S, key: &str) -> Self {
        let lines = PersistedCollection::hydrate(storage, key, merge_lines);
        let totals = CartTotals::compute(lines.values());
        tracing::debug!(
            key,
            lines = lines.len(),
            total_items = totals.total_items,
            "Opened cart"
        );
        Self { lines, totals }
    }

    /// Add `item` to the cart.
    ///
    /// If the product is already in the cart its quantity grows by
    /// `item.quantity()` and the stored display fields are kept; otherwise
    /// the item is appended.
    pub fn add_item(&mut self, item: CartItem) {
        let id = item.id().clone();
        let added = item.quantity();

        let quantity = match self.lines.get_mut(&id) {
            Some(existing) => {
                existing.merge_quantity(added);
                existing.quantity()
            }
            None => {
                self.lines.push(item);
                added
            }
        };

        tracing::debug!(product_id = %id, added = added.get(), quantity = quantity.get(), "Added item to cart");
        add_breadcrumb(
            "cart",
            "Added item",
            &[("product_id", id.to_string()), ("quantity", quantity.to_string())],
        );
        self.commit();
    }

    /// Remove the line for `id`. Does nothing if it is not in the cart.
    pub fn remove_item(&mut self, id: &ProductId) {
        if self.lines.remove(id).is_some() {
            tracing::debug!(product_id = %id, "Removed item from cart");
            add_breadcrumb("cart", "Removed item", &[("product_id", id.to_string())]);
        }
        self.commit();
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A `quantity` of zero or below removes the line. Does nothing if `id`
    /// is not in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        let Some(quantity) = Quantity::from_requested(quantity) else {
            self.remove_item(id);
            return;
        };

        if let Some(line) = self.lines.get_mut(id) {
            line.set_quantity(quantity);
            tracing::debug!(product_id = %id, quantity = quantity.get(), "Updated cart quantity");
            add_breadcrumb(
                "cart",
                "Updated quantity",
                &[("product_id", id.to_string()), ("quantity", quantity.to_string())],
            );
        }
        self.commit();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        tracing::debug!(key = self.lines.key(), "Cleared cart");
        add_breadcrumb("cart", "Cleared cart", &[]);
        self.commit();
    }

    /// Discard in-memory lines and hydrate again from storage.
    ///
    /// Picks up the last write made by another process sharing the storage.
    pub fn reload(&mut self) {
        self.lines.reload(merge_lines);
        self.refresh_totals();
    }

    /// Write the cart to storage now, returning any failure.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the storage write fails.
    pub fn persist(&self) -> error::Result<()> {
        self.lines.persist()
    }

    /// Lines in the order they were first added.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &CartItem> + DoubleEndedIterator {
        self.lines.values()
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.lines.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.lines.contains(id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.lines.state()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.totals.total_items
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.totals.total_amount
    }

    #[must_use]
    pub const fn totals(&self) -> CartTotals {
        self.totals
    }

    /// The storage backend this cart writes to.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.lines.storage()
    }

    fn refresh_totals(&mut self) {
        self.totals = CartTotals::compute(self.lines.values());
    }

    fn commit(&mut self) {
        self.refresh_totals();
        self.lines.write_through();
    }
}

/// Duplicate stored lines merge the same way repeated adds do.
fn merge_lines(existing: &mut CartItem, duplicate: CartItem) {
    existing.merge_quantity(duplicate.quantity());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tote_core::Product;

    use super::*;
    use crate::storage::MemoryStorage;

    fn item(id: i64, price: Decimal, quantity: u32) -> CartItem {
        let product = Product::new(ProductId::from(id), format!("Product {id}"), price).unwrap();
        CartItem::new(product, Quantity::new(quantity).unwrap())
    }

    fn ids(cart: &CartStore<MemoryStorage>) -> Vec<ProductId> {
        cart.items().map(|i| i.id().clone()).collect()
    }

    fn stored(storage: &MemoryStorage) -> Vec<CartItem> {
        serde_json::from_str(&storage.get(CART_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = CartStore::open(MemoryStorage::new());
        assert!(cart.is_empty());
        assert_eq!(cart.state(), CollectionState::Empty);
        assert_eq!(cart.totals(), CartTotals::default());
    }

    #[test]
    fn test_totals_at_price_and_quantity_limits() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(1, tote_core::MAX_PRICE, u32::MAX));
        cart.add_item(item(1, tote_core::MAX_PRICE, u32::MAX));
        cart.add_item(item(2, tote_core::MAX_PRICE, u32::MAX));

        let line = tote_core::MAX_PRICE * Decimal::from(u32::MAX);
        assert_eq!(cart.total_items(), 2 * u64::from(u32::MAX));
        assert_eq!(cart.total_amount(), line + line);
    }

    #[test]
    fn test_oversized_stored_line_is_dropped() {
        let storage = MemoryStorage::with_entries([(
            CART_KEY,
            r#"[
                {"id": 1, "name": "Yacht", "price": 100000000000000000000, "quantity": 1000000000},
                {"id": 2, "name": "Tee", "price": 20, "quantity": 4294967295}
            ]"#,
        )]);

        let cart = CartStore::open(storage);

        assert_eq!(ids(&cart), vec![ProductId::from(2)]);
        assert_eq!(cart.total_amount(), Decimal::from(20) * Decimal::from(u32::MAX));
    }

    #[test]
    fn test_add_item_merges_quantities() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(1, Decimal::from(10), 2));
        cart.add_item(item(1, Decimal::from(10), 3));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::from(1)).unwrap().quantity().get(), 5);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_amount(), Decimal::from(50));
    }

    #[test]
    fn test_add_item_keeps_existing_display_fields() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(1, Decimal::from(10), 1));

        let renamed = Product::new(ProductId::from(1), "Renamed", Decimal::from(99)).unwrap();
        cart.add_item(CartItem::new(renamed, Quantity::ONE));

        let line = cart.get(&ProductId::from(1)).unwrap();
        assert_eq!(line.product().name(), "Product 1");
        assert_eq!(line.product().price(), Decimal::from(10));
        assert_eq!(line.quantity().get(), 2);
    }

    #[test]
    fn test_add_item_preserves_insertion_order() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(3, Decimal::ONE, 1));
        cart.add_item(item(1, Decimal::ONE, 1));
        cart.add_item(item(2, Decimal::ONE, 1));
        cart.add_item(item(3, Decimal::ONE, 1));

        assert_eq!(
            ids(&cart),
            vec![ProductId::from(3), ProductId::from(1), ProductId::from(2)]
        );
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(1, Decimal::ONE, 1));
        cart.add_item(item(2, Decimal::ONE, 1));

        cart.remove_item(&ProductId::from(1));
        let once = ids(&cart);
        cart.remove_item(&ProductId::from(1));

        assert_eq!(ids(&cart), once);
        assert_eq!(once, vec![ProductId::from(2)]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(1, Decimal::ONE, 4));
        cart.remove_item(&ProductId::from(99));

        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(item(1, Decimal::new(250, 2), 1));
        cart.update_quantity(&ProductId::from(1), 4);

        assert_eq!(cart.get(&ProductId::from(1)).unwrap().quantity().get(), 4);
        assert_eq!(cart.total_amount(), Decimal::from(10));
    }

    #[test]
    fn test_update_quantity_floor_removes() {
        for requested in [0, -5] {
            let mut cart = CartStore::open(MemoryStorage::new());
            cart.add_item(item(1, Decimal::ONE, 3));
            cart.add_item(item(2, Decimal::ONE, 1));

            cart.update_quantity(&ProductId::from(1), requested);

            assert!(!cart.contains(&ProductId::from(1)), "quantity {requested}");
            assert_eq!(cart.total_items(), 1);
        }
    }

    #[test]
    fn test_update_quantity_missing_is_noop() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.update_quantity(&ProductId::from(1), 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_cart() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());
        cart.add_item(item(1, Decimal::from(5), 2));
        cart.add_item(item(2, Decimal::from(7), 1));

        cart.clear_cart();

        assert_eq!(cart.items().count(), 0);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_amount(), Decimal::ZERO);
        assert_eq!(cart.state(), CollectionState::Empty);
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());

        cart.add_item(item(1, Decimal::ONE, 1));
        assert_eq!(stored(&storage).len(), 1);

        cart.add_item(item(2, Decimal::ONE, 1));
        cart.update_quantity(&ProductId::from(2), 6);
        assert_eq!(stored(&storage)[1].quantity().get(), 6);

        cart.remove_item(&ProductId::from(1));
        assert_eq!(stored(&storage).len(), 1);
    }

    #[test]
    fn test_reopen_restores_cart() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());
        cart.add_item(item(1, Decimal::new(1999, 2), 2));
        cart.add_item(item(2, Decimal::new(500, 2), 1));
        let before: Vec<CartItem> = cart.items().cloned().collect();
        drop(cart);

        let reopened = CartStore::open(storage);
        let after: Vec<CartItem> = reopened.items().cloned().collect();

        assert_eq!(after, before);
        assert_eq!(reopened.total_amount(), Decimal::new(4498, 2));
    }

    #[test]
    fn test_hydrate_merges_duplicate_lines() {
        let raw = r#"[
            {"id": 1, "name": "Tee", "price": 10, "image": null, "quantity": 2},
            {"id": 1, "name": "Tee", "price": 10, "image": null, "quantity": 3}
        ]"#;
        let cart = CartStore::open(MemoryStorage::with_entries([(CART_KEY, raw)]));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_reload_picks_up_external_write() {
        let storage = MemoryStorage::new();
        let mut ours = CartStore::open(storage.clone());
        let mut theirs = CartStore::open(storage.clone());

        theirs.add_item(item(7, Decimal::from(3), 2));
        assert!(ours.is_empty());

        ours.reload();
        assert_eq!(ours.total_items(), 2);
        assert_eq!(ours.total_amount(), Decimal::from(6));
    }

    #[test]
    fn test_custom_key() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open_with_key(storage.clone(), "cart-guest");
        cart.add_item(item(1, Decimal::ONE, 1));

        assert!(storage.get("cart-guest").unwrap().is_some());
        assert!(storage.get(CART_KEY).unwrap().is_none());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64, i64, u32),
        Remove(i64),
        Update(i64, i64),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0..6i64, 0..10_000i64, 1..20u32).prop_map(|(id, cents, qty)| Op::Add(id, cents, qty)),
            1 => (0..6i64, 0..=100_000_000_000i64, (u32::MAX - 5)..=u32::MAX)
                .prop_map(|(id, cents, qty)| Op::Add(id, cents, qty)),
            2 => (0..6i64).prop_map(Op::Remove),
            2 => (0..6i64, -3..10i64).prop_map(|(id, qty)| Op::Update(id, qty)),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_totals_match_fresh_recomputation(ops in proptest::collection::vec(op(), 0..40)) {
            let mut cart = CartStore::open(MemoryStorage::new());

            for op in ops {
                match op {
                    Op::Add(id, cents, qty) => {
                        cart.add_item(item(id, Decimal::new(cents, 2), qty));
                    }
                    Op::Remove(id) => cart.remove_item(&ProductId::from(id)),
                    Op::Update(id, qty) => cart.update_quantity(&ProductId::from(id), qty),
                    Op::Clear => cart.clear_cart(),
                }

                let expected_items: u64 = cart.items().map(|i| u64::from(i.quantity().get())).sum();
                let expected_amount: Decimal = cart
                    .items()
                    .map(|i| i.product().price() * Decimal::from(i.quantity().get()))
                    .sum();

                prop_assert_eq!(cart.total_items(), expected_items);
                prop_assert_eq!(cart.total_amount(), expected_amount);
                prop_assert!(cart.items().all(|i| i.quantity().get() >= 1));

                let mut seen = std::collections::HashSet::new();
                prop_assert!(cart.items().all(|i| seen.insert(i.id().clone())));
            }
        }
    }
}
