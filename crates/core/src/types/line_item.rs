//! Cart and favourites line items.
//!
//! [`Product`] is the display snapshot a shopper saves to favourites;
//! [`CartItem`] is a product plus a [`Quantity`]. Both validate on
//! construction and on deserialization, so a value of either type always
//! satisfies:
//!
//! - `id` is an integer or a non-blank string
//! - `name` is not blank
//! - `price` (and `originalPrice`, when present) is in `0..=MAX_PRICE`
//! - `quantity` is `>= 1`
//!
//! # Wire format
//!
//! ```json
//! { "id": 1, "name": "Tee", "price": 19.99, "image": null, "quantity": 2 }
//! ```
//!
//! Field names are camelCase. Prices are exact JSON numbers: the decimal
//! digits are written as-is, never routed through `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::quantity::Quantity;

/// Largest accepted unit price.
///
/// With quantities capped at `u32::MAX`, a line total stays well inside
/// `Decimal`'s range.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Errors that can occur when building a line item.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineItemError {
    /// The product id is blank.
    #[error("product id cannot be empty")]
    EmptyId,
    /// The product name is blank.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The price is below zero.
    #[error("price cannot be negative (got {0})")]
    NegativePrice(Decimal),
    /// The original price is below zero.
    #[error("original price cannot be negative (got {0})")]
    NegativeOriginalPrice(Decimal),
    /// The price is above [`MAX_PRICE`].
    #[error("price cannot exceed {max} (got {0})", max = MAX_PRICE)]
    PriceTooLarge(Decimal),
    /// The original price is above [`MAX_PRICE`].
    #[error("original price cannot exceed {max} (got {0})", max = MAX_PRICE)]
    OriginalPriceTooLarge(Decimal),
    /// The quantity is zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// A product snapshot as shown in a listing.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use tote_core::{Product, ProductId};
///
/// let tee = Product::new(ProductId::from(1), "Tee", Decimal::new(1999, 2))
///     .unwrap()
///     .with_color("black");
/// assert_eq!(tee.color(), Some("black"));
///
/// assert!(Product::new(ProductId::from(2), " ", Decimal::ONE).is_err());
/// assert!(Product::new(ProductId::from(3), "Mug", Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    image: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::arbitrary_precision::serialize")]
    price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::arbitrary_precision_option::serialize"
    )]
    original_price: Option<Decimal>,
}

impl Product {
    /// Create a product with the required fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the price is negative or
    /// above [`MAX_PRICE`].
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, LineItemError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LineItemError::EmptyName);
        }
        let price = check_price(price)
            .map_err(|e| e.map(LineItemError::NegativePrice, LineItemError::PriceTooLarge))?;
        Ok(Self {
            id,
            name,
            description: None,
            image: None,
            price,
            size: None,
            color: None,
            original_price: None,
        })
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the size label.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Set the colour label.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the pre-discount price.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or above [`MAX_PRICE`].
    pub fn with_original_price(mut self, original_price: Decimal) -> Result<Self, LineItemError> {
        let original_price = check_price(original_price).map_err(|e| {
            e.map(
                LineItemError::NegativeOriginalPrice,
                LineItemError::OriginalPriceTooLarge,
            )
        })?;
        self.original_price = Some(original_price);
        Ok(self)
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    #[must_use]
    pub const fn original_price(&self) -> Option<Decimal> {
        self.original_price
    }
}

enum PriceBound {
    Negative(Decimal),
    TooLarge(Decimal),
}

impl PriceBound {
    fn map(
        self,
        negative: fn(Decimal) -> LineItemError,
        too_large: fn(Decimal) -> LineItemError,
    ) -> LineItemError {
        match self {
            Self::Negative(price) => negative(price),
            Self::TooLarge(price) => too_large(price),
        }
    }
}

/// Range-check a price and strip trailing zeros.
fn check_price(price: Decimal) -> Result<Decimal, PriceBound> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PriceBound::Negative(price));
    }
    if price > MAX_PRICE {
        return Err(PriceBound::TooLarge(price));
    }
    Ok(price.normalize())
}

/// A price read with `deserialize_any`, so it stays exact inside buffered
/// (flattened) input and accepts numeric strings.
#[derive(Deserialize)]
#[serde(transparent)]
struct PriceNumber(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

/// Unvalidated wire form of [`Product`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image: Option<String>,
    price: PriceNumber,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    original_price: Option<PriceNumber>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = LineItemError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let mut product = Self::new(record.id, record.name, record.price.0)?;
        product.description = record.description;
        product.image = record.image;
        product.size = record.size;
        product.color = record.color;
        match record.original_price {
            Some(PriceNumber(original)) => product.with_original_price(original),
            None => Ok(product),
        }
    }
}

/// A product in the cart with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    product: Product,
    quantity: Quantity,
}

impl CartItem {
    /// Create a cart item.
    #[must_use]
    pub const fn new(product: Product, quantity: Quantity) -> Self {
        Self { product, quantity }
    }

    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        self.product.id()
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Replace the quantity, leaving every other field untouched.
    pub const fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// Add `quantity` to this line (saturating).
    pub const fn merge_quantity(&mut self, quantity: Quantity) {
        self.quantity = self.quantity.saturating_add(quantity);
    }

    /// `price * quantity`, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price()
            .checked_mul(Decimal::from(self.quantity.get()))
            .unwrap_or(Decimal::MAX)
    }

    /// Consume the item and return its product.
    #[must_use]
    pub fn into_product(self) -> Product {
        self.product
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tee() -> Product {
        Product::new(ProductId::from(1), "Tee", Decimal::new(1999, 2)).unwrap()
    }

    #[test]
    fn test_new_rejects_blank_name() {
        assert_eq!(
            Product::new(ProductId::from(1), "", Decimal::ONE),
            Err(LineItemError::EmptyName)
        );
    }

    #[test]
    fn test_new_rejects_negative_price() {
        assert!(matches!(
            Product::new(ProductId::from(1), "Tee", Decimal::new(-1, 2)),
            Err(LineItemError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_free_product_allowed() {
        assert!(Product::new(ProductId::from(1), "Sticker", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_original_price_validated() {
        assert!(tee().with_original_price(Decimal::new(2499, 2)).is_ok());
        assert!(matches!(
            tee().with_original_price(Decimal::NEGATIVE_ONE),
            Err(LineItemError::NegativeOriginalPrice(_))
        ));
    }

    #[test]
    fn test_rejects_price_above_max() {
        assert!(Product::new(ProductId::from(1), "Tee", MAX_PRICE).is_ok());
        assert!(matches!(
            Product::new(ProductId::from(1), "Yacht", Decimal::from_scientific("1e20").unwrap()),
            Err(LineItemError::PriceTooLarge(_))
        ));
        assert!(matches!(
            tee().with_original_price(MAX_PRICE + Decimal::ONE),
            Err(LineItemError::OriginalPriceTooLarge(_))
        ));

        let too_large = json!({ "id": 1, "name": "Yacht", "price": 1e20 });
        assert!(serde_json::from_value::<Product>(too_large).is_err());
    }

    #[test]
    fn test_price_trailing_zeros_stripped() {
        let product = Product::new(ProductId::from(1), "Tee", Decimal::new(1000, 2)).unwrap();
        assert_eq!(product.price().to_string(), "10");
        assert!(serde_json::to_string(&product).unwrap().ends_with("\"price\":10}"));
    }

    #[test]
    fn test_high_precision_price_survives_round_trip() {
        let price: Decimal = "123456789.123456789123456789".parse().unwrap();
        let original: Decimal = "999999999.000000000000000001".parse().unwrap();
        let item = CartItem::new(
            Product::new(ProductId::from(1), "Bond", price)
                .unwrap()
                .with_original_price(original)
                .unwrap(),
            Quantity::new(3).unwrap(),
        );

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"price\":123456789.123456789123456789"));

        let parsed: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.product().price().to_string(), price.to_string());
        assert_eq!(
            parsed.product().original_price().map(|p| p.to_string()),
            Some(original.to_string())
        );

        let via_value: CartItem =
            serde_json::from_value(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(via_value, item);
    }

    #[test]
    fn test_line_total_at_bounds_does_not_overflow() {
        let item = CartItem::new(
            Product::new(ProductId::from(1), "Yacht", MAX_PRICE).unwrap(),
            Quantity::new(u32::MAX).unwrap(),
        );
        assert_eq!(item.line_total(), MAX_PRICE * Decimal::from(u32::MAX));
    }

    #[test]
    fn test_product_wire_format() {
        let product = tee().with_size("M");
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["id"], json!(1));
        assert_eq!(value["name"], json!("Tee"));
        assert_eq!(value["price"], json!(19.99));
        assert_eq!(value["image"], json!(null));
        assert_eq!(value["size"], json!("M"));
        assert!(value.get("originalPrice").is_none());
    }

    #[test]
    fn test_product_accepts_camel_case_optional_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "sku-9",
            "name": "Hoodie",
            "price": 45,
            "originalPrice": 60.5,
            "color": "black"
        }))
        .unwrap();

        assert_eq!(product.id(), &ProductId::Text("sku-9".to_string()));
        assert_eq!(product.price(), Decimal::from(45));
        assert_eq!(product.original_price(), Some(Decimal::new(605, 1)));
        assert_eq!(product.color(), Some("black"));
        assert_eq!(product.image(), None);
    }

    #[test]
    fn test_product_deserialize_rejects_malformed() {
        let missing_price = json!({ "id": 1, "name": "Tee" });
        assert!(serde_json::from_value::<Product>(missing_price).is_err());

        let negative = json!({ "id": 1, "name": "Tee", "price": -3 });
        assert!(serde_json::from_value::<Product>(negative).is_err());

        let blank_name = json!({ "id": 1, "name": "  ", "price": 3 });
        assert!(serde_json::from_value::<Product>(blank_name).is_err());

        let no_id = json!({ "name": "Tee", "price": 3 });
        assert!(serde_json::from_value::<Product>(no_id).is_err());
    }

    #[test]
    fn test_cart_item_flattens_product() {
        let item = CartItem::new(tee(), Quantity::new(2).unwrap());
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["id"], json!(1));
        assert_eq!(value["quantity"], json!(2));

        let parsed: CartItem = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_cart_item_rejects_zero_quantity() {
        let value = json!({ "id": 1, "name": "Tee", "price": 1, "quantity": 0 });
        assert!(serde_json::from_value::<CartItem>(value).is_err());

        let value = json!({ "id": 1, "name": "Tee", "price": 1 });
        assert!(serde_json::from_value::<CartItem>(value).is_err());
    }

    #[test]
    fn test_line_total() {
        let item = CartItem::new(tee(), Quantity::new(3).unwrap());
        assert_eq!(item.line_total(), Decimal::new(5997, 2));
    }

    #[test]
    fn test_merge_and_set_quantity() {
        let mut item = CartItem::new(tee(), Quantity::new(2).unwrap());
        item.merge_quantity(Quantity::new(3).unwrap());
        assert_eq!(item.quantity().get(), 5);

        item.set_quantity(Quantity::ONE);
        assert_eq!(item.quantity().get(), 1);
        assert_eq!(item.product(), &tee());
    }
}
