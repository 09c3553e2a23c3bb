//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! tote cart add --id 1 --name "Tee" --price 19.99 --quantity 2
//! tote cart update 1 5
//! tote cart remove 1
//! tote cart clear
//! tote cart show --json
//! ```

use clap::Subcommand;
use tote_core::{CartItem, ProductId, Quantity};
use tote_storefront::AppState;
use tote_storefront::storage::Storage;
use tote_storefront::view::CartView;

use super::{CliError, ProductArgs, print_line};

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Add a product (repeated adds accumulate quantity)
    Add {
        #[command(flatten)]
        product: ProductArgs,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: String,
    },
    /// Set a product's quantity (zero or below removes it)
    Update {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Run a cart command against `state`.
pub fn run<S: Storage>(state: &mut AppState<S>, action: CartAction) -> Result<(), CliError> {
    match action {
        CartAction::Add { product, quantity } => {
            let item = CartItem::new(product.into_product()?, Quantity::new(quantity)?);
            state.cart_mut().add_item(item);
        }
        CartAction::Remove { id } => {
            state.cart_mut().remove_item(&ProductId::from_input(&id)?);
        }
        CartAction::Update { id, quantity } => {
            state
                .cart_mut()
                .update_quantity(&ProductId::from_input(&id)?, quantity);
        }
        CartAction::Clear => state.cart_mut().clear_cart(),
        CartAction::Show { json } => {
            let view = state.cart_view();
            if json {
                print_line(&serde_json::to_string_pretty(&view)?);
            } else {
                render(&view).iter().for_each(|line| print_line(line));
            }
            return Ok(());
        }
    }

    // The mutation already wrote through; persisting again turns a failed
    // write into a non-zero exit status.
    state.cart().persist()?;
    print_line(&summary(&state.cart_view()));
    Ok(())
}

fn summary(view: &CartView) -> String {
    let noun = if view.item_count == 1 { "item" } else { "items" };
    format!("Cart: {} {noun}, subtotal {}", view.item_count, view.subtotal)
}

fn render(view: &CartView) -> Vec<String> {
    if view.items.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = view
        .items
        .iter()
        .map(|item| {
            let variant = item
                .variant
                .as_ref()
                .map_or_else(String::new, |v| format!(" ({v})"));
            format!(
                "{:>4} x {}{variant} [{}] @ {} = {}",
                item.quantity, item.name, item.id, item.price, item.line_price
            )
        })
        .collect();
    lines.push(summary(view));
    lines
}
