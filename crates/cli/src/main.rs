//! Tote CLI - Cart and favourites from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add two shirts to the cart
//! tote cart add --id 1 --name "Tee" --price 19.99 --quantity 2
//!
//! # Set a line's quantity (zero or below removes it)
//! tote cart update 1 0
//!
//! # Toggle a favourite
//! tote fav toggle --id sku-9 --name "Hoodie" --price 45
//!
//! # Show the cart as JSON
//! tote cart show --json
//! ```
//!
//! # Commands
//!
//! - `cart add|remove|update|clear|show` - Manage the cart
//! - `fav toggle|remove|clear|show` - Manage favourites
//!
//! State lives in `TOTE_DATA_DIR` (default `.tote`), see
//! [`tote_storefront::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tote_storefront::storage::Storage;
use tote_storefront::{AppState, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;
use commands::cart::CartAction;
use commands::favourites::FavAction;

#[derive(Parser)]
#[command(name = "tote")]
#[command(author, version, about = "Tote cart and favourites tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favourites
    #[command(alias = "favourites")]
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output on stdout stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tote_cli=info,tote_storefront=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let mut state = AppState::from_config(config);

    if let Err(e) = run(cli, &mut state) {
        tracing::error!("Command failed: {e}");
        // exit() skips destructors; flush Sentry first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn run<S: Storage>(cli: Cli, state: &mut AppState<S>) -> Result<(), CliError> {
    match cli.command {
        Commands::Cart { action } => commands::cart::run(state, action),
        Commands::Fav { action } => commands::favourites::run(state, action),
    }
}
