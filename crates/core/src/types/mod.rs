//! Core types for Cart Rules.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod percentage;
pub mod price;

pub use id::*;
pub use percentage::{Percentage, PercentageError};
pub use price::{CurrencyCode, Money};
