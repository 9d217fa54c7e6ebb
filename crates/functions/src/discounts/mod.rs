//! Discount functions and their shared payload types.
//!
//! - [`tiered`] - The highest subtotal tier reached selects a collection;
//!   the best per-product discount for that collection is applied
//! - [`threshold`] - Above a cart total, every line in one collection gets
//!   a fixed percentage off

pub mod threshold;
pub mod tiered;

use cart_rules_core::{CartLineId, Money, Percentage, ProductVariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FunctionError;
use crate::types::{ConfigurationNode, Merchandise, ProductVariant};

/// Host payload for the discount extension points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Cart snapshot.
    pub cart: DiscountCart,
    /// The discount instance; its metafield holds the configuration.
    #[serde(default)]
    pub discount_node: ConfigurationNode,
}

/// Cart as selected by the discount input queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCart {
    /// Line items in cart order.
    pub lines: Vec<DiscountCartLine>,
}

impl DiscountCart {
    /// Sum of price × quantity over the lines accepted by `include`.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionError::AmountOverflow`] if a line total or the sum
    /// does not fit in a decimal.
    pub fn subtotal(
        &self,
        mut include: impl FnMut(&DiscountCartLine) -> bool,
    ) -> Result<Decimal, FunctionError> {
        self.lines
            .iter()
            .filter(|line| include(line))
            .try_fold(Decimal::ZERO, |sum, line| {
                line.total()
                    .and_then(|total| sum.checked_add(total))
                    .ok_or(FunctionError::AmountOverflow)
            })
    }
}

/// One line of the cart with its cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCartLine {
    /// Cart line global ID, when the input query selects it.
    #[serde(default)]
    pub id: Option<CartLineId>,
    /// Requested quantity.
    pub quantity: i64,
    /// Unit cost.
    pub cost: CartLineCost,
    /// What is being bought.
    pub merchandise: Merchandise,
}

impl DiscountCartLine {
    /// Line total before discounts, `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.cost.amount_per_quantity.times(self.quantity)
    }

    /// The product variant on this line, if any.
    #[must_use]
    pub const fn variant(&self) -> Option<&ProductVariant> {
        self.merchandise.as_variant()
    }
}

/// Cost of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    /// Price of one unit.
    pub amount_per_quantity: Money,
}

/// Result handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResult {
    /// Discounts to apply.
    pub discounts: Vec<Discount>,
    /// How the host combines the discounts.
    pub discount_application_strategy: DiscountApplicationStrategy,
}

impl DiscountResult {
    /// No discount applies.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            discounts: Vec::new(),
            discount_application_strategy: DiscountApplicationStrategy::First,
        }
    }

    /// A single discount, applied with the `FIRST` strategy.
    #[must_use]
    pub fn single(discount: Discount) -> Self {
        Self {
            discounts: vec![discount],
            discount_application_strategy: DiscountApplicationStrategy::First,
        }
    }
}

/// Discount application strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountApplicationStrategy {
    /// Apply the first discount whose conditions are met.
    #[default]
    First,
    /// Apply the discount with the largest savings.
    Maximum,
}

/// A discount offered to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Message shown next to the discounted lines.
    pub message: Option<String>,
    /// What the discount applies to.
    pub targets: Vec<Target>,
    /// How much is taken off.
    pub value: Value,
}

/// Something a discount applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    ProductVariant(ProductVariantTarget),
    CartLine(CartLineTarget),
}

/// Discount target by product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariantTarget {
    pub id: ProductVariantId,
    /// Units to discount; `None` means all.
    pub quantity: Option<i64>,
}

/// Discount target by cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineTarget {
    pub id: CartLineId,
    /// Units to discount; `None` means all.
    pub quantity: Option<i64>,
}

/// Discount amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Percentage(PercentageValue),
}

/// Percentage off the targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageValue {
    pub value: Percentage,
}

impl Value {
    /// Percentage discount value.
    #[must_use]
    pub const fn percentage(value: Percentage) -> Self {
        Self::Percentage(PercentageValue { value })
    }
}
