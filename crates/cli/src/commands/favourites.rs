//! Favourites commands.
//!
//! # Usage
//!
//! ```bash
//! tote fav toggle --id 7 --name "Mug" --price 12
//! tote fav remove 7
//! tote fav clear
//! tote fav show --json
//! ```

use clap::Subcommand;
use tote_core::ProductId;
use tote_storefront::storage::Storage;
use tote_storefront::view::FavouritesView;
use tote_storefront::{AppState, Toggle};

use super::{CliError, ProductArgs, print_line};

#[derive(Debug, Subcommand)]
pub enum FavAction {
    /// Add a product, or remove it if it is already a favourite
    Toggle {
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Remove a product
    Remove {
        /// Product id
        id: String,
    },
    /// Remove every favourite
    Clear,
    /// Print favourites
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Run a favourites command against `state`.
pub fn run<S: Storage>(state: &mut AppState<S>, action: FavAction) -> Result<(), CliError> {
    match action {
        FavAction::Toggle { product } => {
            let product = product.into_product()?;
            let name = product.name().to_string();
            match state.favourites_mut().add_favourite(product) {
                Toggle::Added => print_line(&format!("Added {name} to favourites")),
                Toggle::Removed => print_line(&format!("Removed {name} from favourites")),
            }
        }
        FavAction::Remove { id } => {
            state
                .favourites_mut()
                .remove_favourite(&ProductId::from_input(&id)?);
        }
        FavAction::Clear => state.favourites_mut().clear_favourites(),
        FavAction::Show { json } => {
            let view = state.favourites_view();
            if json {
                print_line(&serde_json::to_string_pretty(&view)?);
            } else {
                render(&view).iter().for_each(|line| print_line(line));
            }
            return Ok(());
        }
    }

    state.favourites().persist()?;
    print_line(&format!("Favourites: {}", state.favourites().total_items()));
    Ok(())
}

fn render(view: &FavouritesView) -> Vec<String> {
    if view.items.is_empty() {
        return vec!["No favourites".to_string()];
    }

    view.items
        .iter()
        .map(|item| {
            let variant = item
                .variant
                .as_ref()
                .map_or_else(String::new, |v| format!(" ({v})"));
            format!("{}{variant} [{}] {}", item.name, item.id, item.price)
        })
        .collect()
}
