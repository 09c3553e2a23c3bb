//! Cart line quantities.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::line_item::LineItemError;

/// A strictly positive quantity.
///
/// A cart line with nothing in it is not a line, so zero is unrepresentable.
/// Requests that would take a line to zero or below remove it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError::ZeroQuantity`] for zero.
    pub const fn new(value: u32) -> Result<Self, LineItemError> {
        if value == 0 {
            return Err(LineItemError::ZeroQuantity);
        }
        Ok(Self(value))
    }

    /// Interpret a signed request. Anything below one yields `None`, values
    /// beyond `u32::MAX` clamp.
    #[must_use]
    pub fn from_requested(value: i64) -> Option<Self> {
        if value <= 0 {
            return None;
        }
        Some(Self(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Additive merge, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = LineItemError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}
