//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TOTE_DATA_DIR` - Directory for durable storage (default: .tote)
//! - `TOTE_CART_KEY` - Storage key for the cart (default: cart)
//! - `TOTE_FAVOURITES_KEY` - Storage key for favourites (default: favourite)
//! - `TOTE_CURRENCY` - Display currency: USD, EUR, GBP, CAD, AUD (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use tote_core::CurrencyCode;

use crate::cart::CART_KEY;
use crate::favourites::FAVOURITES_KEY;
use crate::storage::validate_key;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory backing `FileStorage`
    pub data_dir: PathBuf,
    /// Storage key for the cart
    pub cart_key: String,
    /// Storage key for favourites
    pub favourites_key: String,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tote"),
            cart_key: CART_KEY.to_string(),
            favourites_key: FAVOURITES_KEY.to_string(),
            currency: CurrencyCode::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = lookup("TOTE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let cart_key = get_key(&lookup, "TOTE_CART_KEY", defaults.cart_key)?;
        let favourites_key = get_key(&lookup, "TOTE_FAVOURITES_KEY", defaults.favourites_key)?;
        if cart_key == favourites_key {
            return Err(ConfigError::InvalidEnvVar(
                "TOTE_FAVOURITES_KEY".to_string(),
                format!("must differ from TOTE_CART_KEY ({cart_key})"),
            ));
        }

        let currency = match lookup("TOTE_CURRENCY") {
            Some(value) => value.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("TOTE_CURRENCY".to_string(), e.to_string())
            })?,
            None => defaults.currency,
        };

        Ok(Self {
            data_dir,
            cart_key,
            favourites_key,
            currency,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a storage key, falling back to `default` and rejecting keys no
/// storage backend accepts.
fn get_key(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: String,
) -> Result<String, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    validate_key(&value).map_err(|_| {
        ConfigError::InvalidEnvVar(
            var.to_string(),
            format!("{value:?} must be 1-64 ASCII letters, digits, '-' or '_'"),
        )
    })?;
    Ok(value)
}
