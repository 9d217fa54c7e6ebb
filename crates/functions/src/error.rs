//! Error types for checkout functions.

use cart_rules_core::{CollectionId, PercentageError};
use thiserror::Error;

/// Merchant configuration could not be turned into rules.
///
/// Raised before any cart line is evaluated. These errors are never shown
/// to the shopper; they surface to the merchant through logs and the
/// `check-config` command.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration payload is not JSON of the expected shape.
    #[error("invalid configuration payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload is valid JSON but has no `mapping` field.
    #[error("configuration payload has no `mapping` field")]
    MissingMapping,

    /// The host payload carries no configuration where one is required.
    #[error("missing configuration metafield on `{0}`")]
    MissingConfiguration(&'static str),

    /// A quantity limit is not a non-negative integer.
    #[error("invalid quantity limit {value} for collection {collection}")]
    MalformedLimit {
        /// Collection the entry applies to.
        collection: CollectionId,
        /// Raw JSON text of the rejected quantity.
        value: String,
    },

    /// The same collection is configured more than once.
    #[error("collection {0} is configured more than once")]
    DuplicateCollection(CollectionId),

    /// A discount value is not a valid percentage.
    #[error("invalid discount percentage: {0}")]
    InvalidPercentage(#[from] PercentageError),
}

/// Errors returned to the host when a function invocation fails.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The host payload could not be decoded.
    #[error("invalid function input: {0}")]
    Input(#[source] serde_json::Error),

    /// The result could not be encoded.
    #[error("failed to serialize function output: {0}")]
    Output(#[source] serde_json::Error),

    /// A cart amount is too large to compute.
    #[error("cart amount overflow")]
    AmountOverflow,

    /// Merchant configuration is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
