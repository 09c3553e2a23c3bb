//! Store error handling with Sentry integration.
//!
//! Store mutations never fail from the caller's point of view. When the
//! write-through to storage fails, the error is reported here (tracing +
//! Sentry) and the in-memory collection stays authoritative.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by explicit store operations such as `persist`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Collection could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Report a failed write-through without interrupting the caller.
pub(crate) fn report_persist_failure(key: &str, err: &StoreError) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        key,
        error = %err,
        sentry_event_id = %event_id,
        "Failed to persist collection"
    );
}

/// Add a breadcrumb for a store mutation.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart and
/// favourites changes leading up to an error.
pub(crate) fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}
