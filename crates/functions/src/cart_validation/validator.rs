//! Quantity-limit evaluation over cart lines.

use serde::{Deserialize, Serialize};

use super::limits::QuantityLimits;
use crate::types::Product;

/// Target reported for every quantity-limit violation.
pub const CART_TARGET: &str = "cart";

/// Cart snapshot delivered to the validation function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Line items in cart order.
    pub lines: Vec<CartLine>,
}

/// One line of the cart as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Requested quantity.
    pub quantity: i64,
    /// What is being bought.
    pub merchandise: LineMerchandise,
}

/// Merchandise as queried by the validator: only the product matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMerchandise {
    /// Missing for merchandise that is not a product variant.
    #[serde(default)]
    pub product: Option<Product>,
}

/// A checkout-blocking rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Message shown to the shopper.
    #[serde(rename = "localizedMessage")]
    pub message: String,
    /// Where the host shows the message.
    pub target: String,
}

impl ValidationError {
    /// Error for a line over `max_quantity`.
    #[must_use]
    pub fn quantity_exceeded(max_quantity: i64) -> Self {
        Self {
            message: format!("Cannot order more than {max_quantity} of the product"),
            target: CART_TARGET.to_string(),
        }
    }
}

/// Check every line against the limits of the collections it belongs to.
///
/// Produces one error per (line, restricted collection) pair whose limit the
/// line's quantity exceeds, in line order then membership order. Collections
/// without a limit are unrestricted. Nothing is deduplicated and there is no
/// early exit.
#[must_use]
pub fn validate(cart: &Cart, limits: &QuantityLimits) -> Vec<ValidationError> {
    cart.lines
        .iter()
        .flat_map(move |line| {
            let quantity = line.quantity;
            line.merchandise
                .product
                .iter()
                .flat_map(Product::member_collections)
                .filter_map(move |collection| limits.get(collection))
                .filter(move |&max_quantity| quantity > max_quantity)
                .map(ValidationError::quantity_exceeded)
        })
        .collect()
}
