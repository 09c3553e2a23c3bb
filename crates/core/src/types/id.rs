//! Opaque product identifiers.
//!
//! Products arrive from the remote catalogue with either numeric or string
//! ids. The stores never interpret them beyond equality and hashing, so
//! [`ProductId`] keeps whichever form it was given.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::line_item::LineItemError;

/// Identifier of the product behind a cart or favourites entry.
///
/// Serializes transparently as a JSON number or string. An integer id and a
/// string id with the same digits are different ids.
///
/// # Example
///
/// ```rust
/// # use tote_core::ProductId;
/// let numeric = ProductId::from(7);
/// let text = ProductId::parse("sku-7").unwrap();
///
/// assert_ne!(numeric, ProductId::parse("7").unwrap());
/// assert_eq!(text.to_string(), "sku-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawProductId")]
pub enum ProductId {
    /// Numeric id.
    Int(i64),
    /// String id (never blank).
    Text(String),
}

impl ProductId {
    /// Create a string id.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::EmptyId`] if the input is blank.
    pub fn parse(s: &str) -> Result<Self, LineItemError> {
        if s.trim().is_empty() {
            return Err(LineItemError::EmptyId);
        }
        Ok(Self::Text(s.to_owned()))
    }

    /// Interpret user input: digits become an integer id, anything else a
    /// string id.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::EmptyId`] if the input is blank.
    pub fn from_input(s: &str) -> Result<Self, LineItemError> {
        s.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::parse(s), |n| Ok(Self::Int(n)))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

/// Wire form accepted before validation.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Int(i64),
    Text(String),
}

impl TryFrom<RawProductId> for ProductId {
    type Error = LineItemError;

    fn try_from(raw: RawProductId) -> Result<Self, Self::Error> {
        match raw {
            RawProductId::Int(n) => Ok(Self::Int(n)),
            RawProductId::Text(s) => {
                if s.trim().is_empty() {
                    Err(LineItemError::EmptyId)
                } else {
                    Ok(Self::Text(s))
                }
            }
        }
    }
}
