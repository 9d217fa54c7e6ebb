//! Collection quantity limits parsed from merchant configuration.
//!
//! The validation metafield holds JSON of the shape
//! `{"mapping": [{"collection": "<gid>", "qty": "5"}]}` where `qty` is a
//! string or a number. Parsing is explicit: a quantity that is not a
//! non-negative integer is a [`ConfigurationError::MalformedLimit`], never a
//! silently ignored comparison.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use cart_rules_core::CollectionId;
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigurationError;

/// How malformed limit entries are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LimitPolicy {
    /// Skip malformed entries (with a warning) and keep the rest.
    #[default]
    Lenient,
    /// Fail the whole configuration on the first malformed entry.
    Strict,
}

impl fmt::Display for LimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for LimitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("invalid limit policy: {s}")),
        }
    }
}

/// Maximum purchasable quantity for products in one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionLimit {
    /// Restricted collection.
    pub collection_id: CollectionId,
    /// Highest allowed line quantity.
    pub max_quantity: i64,
}

impl CollectionLimit {
    /// Create a limit.
    #[must_use]
    pub fn new(collection_id: impl Into<CollectionId>, max_quantity: i64) -> Self {
        Self {
            collection_id: collection_id.into(),
            max_quantity,
        }
    }
}

/// Lookup from collection to its quantity limit.
///
/// Keeps configuration order for reporting; lookups go through a hash index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantityLimits {
    limits: Vec<CollectionLimit>,
    index: HashMap<CollectionId, usize>,
}

#[derive(Deserialize)]
struct RawConfiguration {
    mapping: Option<Vec<RawLimit>>,
}

#[derive(Deserialize)]
struct RawLimit {
    collection: CollectionId,
    qty: serde_json::Value,
}

impl QuantityLimits {
    /// Build the lookup from an ordered list of limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateCollection`] if a collection
    /// appears twice.
    pub fn from_limits(
        limits: impl IntoIterator<Item = CollectionLimit>,
    ) -> Result<Self, ConfigurationError> {
        let mut result = Self::default();
        for limit in limits {
            if result.index.contains_key(&limit.collection_id) {
                return Err(ConfigurationError::DuplicateCollection(limit.collection_id));
            }
            result
                .index
                .insert(limit.collection_id.clone(), result.limits.len());
            result.limits.push(limit);
        }
        Ok(result)
    }

    /// Parse the validation metafield value.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::Parse`] if the value is not JSON of the
    ///   expected shape
    /// - [`ConfigurationError::MissingMapping`] if `mapping` is absent
    /// - [`ConfigurationError::MalformedLimit`] for a bad quantity under
    ///   [`LimitPolicy::Strict`]
    /// - [`ConfigurationError::DuplicateCollection`] for a repeated collection
    pub fn parse(value: &str, policy: LimitPolicy) -> Result<Self, ConfigurationError> {
        let raw: RawConfiguration = serde_json::from_str(value)?;
        let mapping = raw.mapping.ok_or(ConfigurationError::MissingMapping)?;

        let mut limits = Vec::with_capacity(mapping.len());
        for entry in mapping {
            match parse_quantity(&entry.qty) {
                Some(max_quantity) => limits.push(CollectionLimit {
                    collection_id: entry.collection,
                    max_quantity,
                }),
                None if policy == LimitPolicy::Lenient => {
                    warn!(
                        collection = %entry.collection,
                        qty = %entry.qty,
                        "Skipping malformed quantity limit"
                    );
                }
                None => {
                    return Err(ConfigurationError::MalformedLimit {
                        collection: entry.collection,
                        value: entry.qty.to_string(),
                    });
                }
            }
        }

        Self::from_limits(limits)
    }

    /// Limit for `collection`, if it is restricted.
    #[must_use]
    pub fn get(&self, collection: &CollectionId) -> Option<i64> {
        self.index
            .get(collection)
            .and_then(|&i| self.limits.get(i))
            .map(|limit| limit.max_quantity)
    }

    /// Limits in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionLimit> {
        self.limits.iter()
    }

    /// Number of restricted collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    /// Whether no collection is restricted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// Accepts integer JSON numbers and strings of digits, both non-negative.
fn parse_quantity(value: &serde_json::Value) -> Option<i64> {
    let quantity = match value {
        serde_json::Value::Number(n) => n.as_i64()?,
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (quantity >= 0).then_some(quantity)
}
