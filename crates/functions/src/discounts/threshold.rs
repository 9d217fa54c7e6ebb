//! Collection threshold discount.
//!
//! When the cart total reaches a threshold, every line whose product is in
//! the target collection gets a percentage off. The discount node may carry
//! a configuration; without one the store defaults apply (15% off
//! collection 496241049921 from a 150 total).

use cart_rules_core::{CollectionId, Percentage};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{CartLineTarget, Discount, DiscountResult, Input, Target, Value};
use crate::error::{ConfigurationError, FunctionError};
use crate::function::CheckoutFunction;

const DEFAULT_TARGET_COLLECTION: &str = "gid://shopify/Collection/496241049921";
const DEFAULT_PERCENTAGE: u8 = 15;
const DEFAULT_THRESHOLD: i64 = 150;

/// Threshold discount configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionDiscountConfig {
    /// Collection whose lines are discounted.
    pub target_collection: CollectionId,
    /// Percentage taken off eligible lines.
    pub percentage: Percentage,
    /// Minimum cart total.
    pub threshold: Decimal,
}

impl Default for CollectionDiscountConfig {
    fn default() -> Self {
        Self {
            target_collection: CollectionId::new(DEFAULT_TARGET_COLLECTION),
            percentage: Percentage::from_whole(DEFAULT_PERCENTAGE),
            threshold: Decimal::from(DEFAULT_THRESHOLD),
        }
    }
}

impl CollectionDiscountConfig {
    /// Parse the discount node metafield value; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] if the value is not JSON of the
    /// expected shape or the percentage is out of range.
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(value)?)
    }

    /// Human-readable summary, one line per rule.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        vec![format!(
            "{}: {}% off when the cart total reaches {}",
            self.target_collection, self.percentage, self.threshold
        )]
    }
}

/// The collection threshold discount function.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionDiscount;

impl CheckoutFunction for CollectionDiscount {
    type Input = Input;
    type Output = DiscountResult;

    const NAME: &'static str = "collection-discount";

    #[instrument(skip_all, fields(lines = input.cart.lines.len()))]
    fn run(&self, input: Input) -> Result<DiscountResult, FunctionError> {
        let config = match input.discount_node.value() {
            Some(value) => CollectionDiscountConfig::parse(value)?,
            None => CollectionDiscountConfig::default(),
        };

        let total = input.cart.subtotal(|_| true)?;
        if total < config.threshold {
            debug!(%total, threshold = %config.threshold, "Cart total below threshold");
            return Ok(DiscountResult::none());
        }

        let targets: Vec<Target> = input
            .cart
            .lines
            .iter()
            .filter(|line| {
                line.variant()
                    .is_some_and(|v| v.product.is_member_of(&config.target_collection))
            })
            .filter_map(|line| {
                if line.id.is_none() {
                    debug!("Skipping eligible cart line without an id");
                }
                line.id.clone()
            })
            .map(|id| Target::CartLine(CartLineTarget { id, quantity: None }))
            .collect();

        if targets.is_empty() {
            debug!(collection = %config.target_collection, "No cart lines in target collection");
            return Ok(DiscountResult::none());
        }

        Ok(DiscountResult::single(Discount {
            message: Some(format!(
                "{}% discount applied to eligible collection items.",
                config.percentage
            )),
            targets,
            value: Value::percentage(config.percentage),
        }))
    }
}
