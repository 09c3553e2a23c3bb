//! Subcommand implementations.

pub mod cart;
pub mod favourites;

use clap::Args;
use rust_decimal::Decimal;
use thiserror::Error;
use tote_core::{LineItemError, Product, ProductId};
use tote_storefront::StoreError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Product arguments failed validation.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] LineItemError),

    /// The store could not be written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Product fields shared by `cart add` and `fav toggle`.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product id (digits are treated as a numeric id)
    #[arg(long)]
    pub id: String,

    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Unit price
    #[arg(short, long)]
    pub price: Decimal,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Size label
    #[arg(long)]
    pub size: Option<String>,

    /// Colour label
    #[arg(long)]
    pub color: Option<String>,

    /// Price before discount
    #[arg(long)]
    pub original_price: Option<Decimal>,
}

impl ProductArgs {
    /// Validate into a [`Product`].
    pub fn into_product(self) -> Result<Product, LineItemError> {
        let mut product = Product::new(ProductId::from_input(&self.id)?, self.name, self.price)?;
        if let Some(description) = self.description {
            product = product.with_description(description);
        }
        if let Some(image) = self.image {
            product = product.with_image(image);
        }
        if let Some(size) = self.size {
            product = product.with_size(size);
        }
        if let Some(color) = self.color {
            product = product.with_color(color);
        }
        if let Some(original_price) = self.original_price {
            product = product.with_original_price(original_price)?;
        }
        Ok(product)
    }
}

#[allow(clippy::print_stdout)]
pub(crate) fn print_line(line: &str) {
    println!("{line}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(id: &str, price: Decimal) -> ProductArgs {
        ProductArgs {
            id: id.to_string(),
            name: "Tee".to_string(),
            price,
            description: None,
            image: Some("/tee.jpg".to_string()),
            size: Some("L".to_string()),
            color: None,
            original_price: None,
        }
    }

    #[test]
    fn test_numeric_id_becomes_int() {
        let product = args("12", Decimal::ONE).into_product().unwrap();
        assert_eq!(product.id(), &ProductId::Int(12));
        assert_eq!(product.size(), Some("L"));
        assert_eq!(product.image(), Some("/tee.jpg"));
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = args("12", Decimal::NEGATIVE_ONE).into_product().unwrap_err();
        assert!(matches!(err, LineItemError::NegativePrice(_)));
    }

    #[test]
    fn test_rejects_blank_id() {
        assert!(args(" ", Decimal::ONE).into_product().is_err());
    }
}
