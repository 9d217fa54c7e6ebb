//! Percentage type for discount values.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Percentage`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PercentageError {
    /// The value is below zero.
    #[error("percentage cannot be negative: {0}")]
    Negative(Decimal),
    /// The value is above one hundred.
    #[error("percentage must be at most 100: {0}")]
    TooLarge(Decimal),
}

/// A percentage in the inclusive range `0..=100`.
///
/// ## Examples
///
/// ```
/// use cart_rules_core::Percentage;
/// use rust_decimal::Decimal;
///
/// assert!(Percentage::new(Decimal::new(15, 0)).is_ok());
/// assert!(Percentage::new(Decimal::new(-1, 0)).is_err());
/// assert!(Percentage::new(Decimal::new(101, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(Decimal);

impl Percentage {
    /// Create a percentage, rejecting values outside `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or greater than 100.
    pub fn new(value: Decimal) -> Result<Self, PercentageError> {
        if value < Decimal::ZERO {
            return Err(PercentageError::Negative(value));
        }
        if value > Decimal::ONE_HUNDRED {
            return Err(PercentageError::TooLarge(value));
        }
        Ok(Self(value))
    }

    /// Create from a whole number of percent, capped at 100.
    #[must_use]
    pub fn from_whole(percent: u8) -> Self {
        Self(Decimal::from(percent.min(100)))
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = PercentageError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(percentage: Percentage) -> Self {
        percentage.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
