//! Host payload types shared by several functions.

use cart_rules_core::{CollectionId, ProductVariantId};
use serde::{Deserialize, Serialize};

/// A metafield as delivered by the host: the value is a serialized string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    /// Raw metafield value (JSON text for every configuration we read).
    pub value: String,
}

/// A host object that may carry a configuration metafield.
///
/// Used for `validation`, `discountNode` and `paymentCustomization`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationNode {
    /// Merchant configuration, absent when the merchant never saved one.
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

impl ConfigurationNode {
    /// Raw configuration value, if present.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.metafield.as_ref().map(|m| m.value.as_str())
    }
}

/// Whether a product belongs to a collection, as seen at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMembership {
    /// Collection the host was asked about.
    pub collection_id: CollectionId,
    /// Whether the product is a member.
    pub is_member: bool,
}

/// The product behind a cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Membership answers, in the order the host lists them.
    #[serde(default)]
    pub in_collections: Vec<CollectionMembership>,
    /// Product-level metafield (per-collection discounts).
    #[serde(default)]
    pub metafield: Option<Metafield>,
}

impl Product {
    /// Collections this product is a member of, in host order.
    pub fn member_collections(&self) -> impl Iterator<Item = &CollectionId> {
        self.in_collections
            .iter()
            .filter(|membership| membership.is_member)
            .map(|membership| &membership.collection_id)
    }

    /// Whether the product is a member of `collection`.
    #[must_use]
    pub fn is_member_of(&self, collection: &CollectionId) -> bool {
        self.member_collections().any(|id| id == collection)
    }

    /// Whether the product is a member of any of `collections`.
    #[must_use]
    pub fn is_member_of_any(&self, collections: &[CollectionId]) -> bool {
        self.member_collections().any(|id| collections.contains(id))
    }
}

/// A product variant line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant global ID.
    pub id: ProductVariantId,
    /// Owning product.
    pub product: Product,
}

/// Merchandise on a cart line, discriminated by the host's `__typename`.
///
/// Anything other than a product variant (custom products, gift cards
/// added by apps) maps to [`Merchandise::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum Merchandise {
    ProductVariant(ProductVariant),
    #[serde(other)]
    Other,
}

impl Merchandise {
    /// The variant, when this merchandise is one.
    #[must_use]
    pub const fn as_variant(&self) -> Option<&ProductVariant> {
        match self {
            Self::ProductVariant(variant) => Some(variant),
            Self::Other => None,
        }
    }
}
