//! Tiered collection discount.
//!
//! The discount node's metafield configures subtotal tiers, each naming a
//! collection, plus collections excluded from the subtotal:
//!
//! ```json
//! {"collectionIds": ["gid://shopify/Collection/987"],
//!  "mapping": [{"collection": "gid://shopify/Collection/1234", "threshold": 300}]}
//! ```
//!
//! Each product carries its own per-collection discount in a metafield:
//!
//! ```json
//! {"collectionDiscounts": [{"collection_id": "gid://shopify/Collection/1234", "discount": 10}]}
//! ```
//!
//! The highest tier reached by the eligible subtotal selects a collection.
//! Among lines in that collection, the product offering the largest
//! discount gets it on its whole line quantity.

use cart_rules_core::{CollectionId, Percentage};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{
    Discount, DiscountCartLine, DiscountResult, Input, ProductVariantTarget, Target, Value,
};
use crate::error::{ConfigurationError, FunctionError};
use crate::function::CheckoutFunction;
use crate::types::ProductVariant;

/// Discount configuration saved on the discount node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredDiscountConfig {
    /// Products in these collections do not count toward the subtotal.
    #[serde(default, alias = "collection_ids")]
    pub collection_ids: Vec<CollectionId>,
    /// Subtotal tiers.
    #[serde(default)]
    pub mapping: Vec<DiscountTier>,
}

/// A subtotal threshold unlocking discounts on one collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscountTier {
    /// Collection whose products become discountable.
    pub collection: CollectionId,
    /// Minimum eligible subtotal.
    pub threshold: Decimal,
}

impl TieredDiscountConfig {
    /// Parse the discount node metafield value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] if the value is not JSON of the
    /// expected shape.
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(value)?)
    }

    /// Highest tier whose threshold `subtotal` reaches.
    ///
    /// Ties keep the tier listed first.
    #[must_use]
    pub fn matching_tier(&self, subtotal: Decimal) -> Option<&DiscountTier> {
        self.mapping
            .iter()
            .filter(|tier| subtotal >= tier.threshold)
            .fold(None, |best: Option<&DiscountTier>, tier| match best {
                Some(current) if tier.threshold <= current.threshold => Some(current),
                _ => Some(tier),
            })
    }

    /// Human-readable summary, one line per rule.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let excluded = self
            .collection_ids
            .iter()
            .map(|id| format!("{id}: excluded from subtotal"));
        let tiers = self
            .mapping
            .iter()
            .map(|tier| format!("{}: unlocked at subtotal {}", tier.collection, tier.threshold));
        excluded.chain(tiers).collect()
    }
}

/// Per-collection discounts saved on a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct ProductDiscounts {
    #[serde(rename = "collectionDiscounts", default)]
    collection_discounts: Vec<CollectionDiscount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct CollectionDiscount {
    collection_id: CollectionId,
    discount: Decimal,
}

impl ProductDiscounts {
    fn parse(value: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(value)?)
    }

    fn for_collection(&self, collection: &CollectionId) -> Option<Decimal> {
        self.collection_discounts
            .iter()
            .find(|entry| &entry.collection_id == collection)
            .map(|entry| entry.discount)
    }
}

/// The tiered collection discount function.
#[derive(Debug, Clone, Copy, Default)]
pub struct TieredDiscount;

impl CheckoutFunction for TieredDiscount {
    type Input = Input;
    type Output = DiscountResult;

    const NAME: &'static str = "tiered-discount";

    #[instrument(skip_all, fields(lines = input.cart.lines.len()))]
    fn run(&self, input: Input) -> Result<DiscountResult, FunctionError> {
        let Some(value) = input.discount_node.value() else {
            debug!("No discount configuration");
            return Ok(DiscountResult::none());
        };
        let config = TieredDiscountConfig::parse(value)?;

        let subtotal = input.cart.subtotal(|line| {
            line.variant()
                .is_some_and(|v| !v.product.is_member_of_any(&config.collection_ids))
        })?;

        let Some(tier) = config.matching_tier(subtotal) else {
            debug!(%subtotal, "Subtotal below every tier");
            return Ok(DiscountResult::none());
        };
        debug!(%subtotal, collection = %tier.collection, "Matched tier");

        let Some((line, variant, percentage)) = best_offer(&input.cart.lines, &tier.collection)?
        else {
            debug!(collection = %tier.collection, "No discountable product in tier collection");
            return Ok(DiscountResult::none());
        };

        Ok(DiscountResult::single(Discount {
            message: Some(format!("{percentage}% off")),
            targets: vec![Target::ProductVariant(ProductVariantTarget {
                id: variant.id.clone(),
                quantity: Some(line.quantity),
            })],
            value: Value::percentage(percentage),
        }))
    }
}

/// Line in `collection` whose product offers the largest positive discount.
///
/// Discounts of zero or less never win. The first line wins ties.
fn best_offer<'a>(
    lines: &'a [DiscountCartLine],
    collection: &CollectionId,
) -> Result<Option<(&'a DiscountCartLine, &'a ProductVariant, Percentage)>, ConfigurationError> {
    let mut best: Option<(&DiscountCartLine, &ProductVariant, Percentage)> = None;

    for line in lines {
        let Some(variant) = line.variant() else {
            continue;
        };
        if !variant.product.is_member_of(collection) {
            continue;
        }
        let Some(metafield) = &variant.product.metafield else {
            continue;
        };
        let Some(discount) = ProductDiscounts::parse(&metafield.value)?.for_collection(collection)
        else {
            continue;
        };

        if discount <= Decimal::ZERO {
            debug!(variant = %variant.id, %discount, "Skipping non-positive product discount");
            continue;
        }
        let percentage = Percentage::new(discount)?;
        if best.is_none_or(|(_, _, current)| percentage > current) {
            best = Some((line, variant, percentage));
        }
    }

    Ok(best)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    const TIER_COLLECTION: &str = "gid://shopify/Collection/1234";
    const EXCLUDED_COLLECTION: &str = "gid://shopify/Collection/987";

    fn variant_line(
        variant: u64,
        quantity: i64,
        amount: &str,
        collections: &[&str],
        discount: Option<u32>,
    ) -> serde_json::Value {
        let metafield = discount.map(|d| {
            json!({"value": json!({"collectionDiscounts": [
                {"collection_id": TIER_COLLECTION, "discount": d}
            ]}).to_string()})
        });
        json!({
            "quantity": quantity,
            "cost": {"amountPerQuantity": {"amount": amount}},
            "merchandise": {
                "__typename": "ProductVariant",
                "id": format!("gid://shopify/ProductVariant/{variant}"),
                "product": {
                    "inCollections": collections
                        .iter()
                        .map(|c| json!({"collectionId": c, "isMember": true}))
                        .collect::<Vec<_>>(),
                    "metafield": metafield
                }
            }
        })
    }

    fn input(config: &serde_json::Value, lines: Vec<serde_json::Value>) -> Input {
        serde_json::from_value(json!({
            "discountNode": {"metafield": {"value": config.to_string()}},
            "cart": {"lines": lines}
        }))
        .unwrap()
    }

    fn single_tier() -> serde_json::Value {
        json!({
            "collectionIds": [EXCLUDED_COLLECTION],
            "mapping": [{"collection": TIER_COLLECTION, "threshold": 300}]
        })
    }

    #[test]
    fn test_no_configuration_no_discount() {
        let input: Input = serde_json::from_value(json!({
            "discountNode": {"metafield": null},
            "cart": {"lines": []}
        }))
        .unwrap();
        assert_eq!(TieredDiscount.run(input).unwrap(), DiscountResult::none());
    }

    #[test]
    fn test_empty_cart_no_discount() {
        let config = json!({"collection_ids": [], "mapping": []});
        let result = TieredDiscount.run(input(&config, vec![])).unwrap();
        assert_eq!(result, DiscountResult::none());
    }

    #[test]
    fn test_applies_discount_to_tier_product() {
        let result = TieredDiscount
            .run(input(
                &single_tier(),
                vec![variant_line(9876, 1, "358.00", &[TIER_COLLECTION], Some(10))],
            ))
            .unwrap();

        assert_eq!(
            result,
            DiscountResult::single(Discount {
                message: Some("10% off".to_string()),
                targets: vec![Target::ProductVariant(ProductVariantTarget {
                    id: "gid://shopify/ProductVariant/9876".into(),
                    quantity: Some(1),
                })],
                value: Value::percentage(Percentage::new(Decimal::new(10, 0)).unwrap()),
            })
        );
    }

    #[test]
    fn test_excluded_collection_does_not_count() {
        let result = TieredDiscount
            .run(input(
                &single_tier(),
                vec![
                    variant_line(1, 1, "358.00", &[EXCLUDED_COLLECTION], None),
                    variant_line(2, 1, "20.00", &[TIER_COLLECTION], Some(10)),
                ],
            ))
            .unwrap();
        assert_eq!(result, DiscountResult::none());
    }

    #[test]
    fn test_highest_reached_tier_wins() {
        let config = json!({"mapping": [
            {"collection": "gid://shopify/Collection/1", "threshold": 100},
            {"collection": TIER_COLLECTION, "threshold": 200},
            {"collection": "gid://shopify/Collection/3", "threshold": 500}
        ]});
        let parsed = TieredDiscountConfig::parse(&config.to_string()).unwrap();

        let tier = parsed.matching_tier(Decimal::new(250, 0)).unwrap();
        assert_eq!(tier.collection.as_str(), TIER_COLLECTION);
        assert!(parsed.matching_tier(Decimal::new(99, 0)).is_none());
        assert_eq!(
            parsed.matching_tier(Decimal::new(500, 0)).unwrap().collection.as_str(),
            "gid://shopify/Collection/3"
        );
    }

    #[test]
    fn test_largest_product_discount_wins() {
        let result = TieredDiscount
            .run(input(
                &single_tier(),
                vec![
                    variant_line(1, 2, "100", &[TIER_COLLECTION], Some(5)),
                    variant_line(2, 3, "100", &[TIER_COLLECTION], Some(20)),
                    variant_line(3, 1, "100", &[TIER_COLLECTION], Some(20)),
                ],
            ))
            .unwrap();

        let discount = &result.discounts[0];
        assert_eq!(discount.message.as_deref(), Some("20% off"));
        assert_eq!(
            discount.targets,
            vec![Target::ProductVariant(ProductVariantTarget {
                id: "gid://shopify/ProductVariant/2".into(),
                quantity: Some(3),
            })]
        );
    }

    #[test]
    fn test_product_outside_tier_collection_ignored() {
        let result = TieredDiscount
            .run(input(
                &single_tier(),
                vec![variant_line(1, 4, "100", &["gid://shopify/Collection/5"], Some(10))],
            ))
            .unwrap();
        assert_eq!(result, DiscountResult::none());
    }

    #[test]
    fn test_invalid_product_metafield_is_error() {
        let mut line = variant_line(1, 4, "100", &[TIER_COLLECTION], None);
        line["merchandise"]["product"]["metafield"] = json!({"value": "not json"});

        let result = TieredDiscount.run(input(&single_tier(), vec![line]));
        assert!(matches!(
            result,
            Err(FunctionError::Configuration(ConfigurationError::Parse(_)))
        ));
    }

    #[test]
    fn test_equal_thresholds_keep_first_tier() {
        let config = json!({"mapping": [
            {"collection": "gid://shopify/Collection/1", "threshold": 200},
            {"collection": "gid://shopify/Collection/2", "threshold": 200}
        ]});
        let parsed = TieredDiscountConfig::parse(&config.to_string()).unwrap();

        let tier = parsed.matching_tier(Decimal::new(250, 0)).unwrap();
        assert_eq!(tier.collection.as_str(), "gid://shopify/Collection/1");
    }

    #[test]
    fn test_negative_discount_skipped() {
        let mut negative = variant_line(1, 4, "100", &[TIER_COLLECTION], None);
        negative["merchandise"]["product"]["metafield"] = json!({"value": json!({
            "collectionDiscounts": [{"collection_id": TIER_COLLECTION, "discount": -5}]
        }).to_string()});

        let result = TieredDiscount
            .run(input(
                &single_tier(),
                vec![
                    negative,
                    variant_line(2, 4, "100", &[TIER_COLLECTION], Some(10)),
                ],
            ))
            .unwrap();

        assert_eq!(
            result,
            DiscountResult::single(Discount {
                message: Some("10% off".to_string()),
                targets: vec![Target::ProductVariant(ProductVariantTarget {
                    id: "gid://shopify/ProductVariant/2".into(),
                    quantity: Some(4),
                })],
                value: Value::percentage(Percentage::new(Decimal::new(10, 0)).unwrap()),
            })
        );
    }

    #[test]
    fn test_only_zero_discounts_no_discount() {
        let result = TieredDiscount
            .run(input(
                &single_tier(),
                vec![variant_line(1, 4, "100", &[TIER_COLLECTION], Some(0))],
            ))
            .unwrap();
        assert_eq!(result, DiscountResult::none());
    }

    #[test]
    fn test_out_of_range_discount_is_error() {
        let result = TieredDiscount.run(input(
            &single_tier(),
            vec![variant_line(1, 4, "100", &[TIER_COLLECTION], Some(150))],
        ));
        assert!(matches!(
            result,
            Err(FunctionError::Configuration(ConfigurationError::InvalidPercentage(_)))
        ));
    }

    #[test]
    fn test_describe() {
        let config = TieredDiscountConfig::parse(&single_tier().to_string()).unwrap();
        assert_eq!(
            config.describe(),
            vec![
                format!("{EXCLUDED_COLLECTION}: excluded from subtotal"),
                format!("{TIER_COLLECTION}: unlocked at subtotal 300"),
            ]
        );
    }
}
