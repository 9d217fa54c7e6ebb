//! Quantity-limit cart validation.
//!
//! Merchants cap how many units of a product a shopper may order per line,
//! per collection. The host calls this function before checkout completes;
//! a non-empty error list blocks checkout and shows the messages.
//!
//! # Input
//!
//! ```json
//! {
//!   "cart": {"lines": [{"quantity": 6, "merchandise": {"product": {
//!     "inCollections": [{"collectionId": "gid://shopify/Collection/1", "isMember": true}]
//!   }}}]},
//!   "validation": {"metafield": {"value": "{\"mapping\":[{\"collection\":\"gid://shopify/Collection/1\",\"qty\":\"5\"}]}"}}
//! }
//! ```
//!
//! # Output
//!
//! ```json
//! {"errors": [{"localizedMessage": "Cannot order more than 5 of the product", "target": "cart"}]}
//! ```

mod limits;
mod validator;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use limits::{CollectionLimit, LimitPolicy, QuantityLimits};
pub use validator::{CART_TARGET, Cart, CartLine, LineMerchandise, ValidationError, validate};

use crate::error::{ConfigurationError, FunctionError};
use crate::function::CheckoutFunction;
use crate::types::ConfigurationNode;

/// Host payload for the validation extension point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Cart snapshot.
    pub cart: Cart,
    /// The validation instance carrying the merchant's limits.
    #[serde(default)]
    pub validation: ConfigurationNode,
}

/// Result handed back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Violations; empty means checkout may proceed.
    pub errors: Vec<ValidationError>,
}

/// The quantity-limit validation function.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartValidation {
    policy: LimitPolicy,
}

impl CartValidation {
    /// Create the function with the given treatment of malformed limits.
    #[must_use]
    pub const fn new(policy: LimitPolicy) -> Self {
        Self { policy }
    }
}

impl CheckoutFunction for CartValidation {
    type Input = Input;
    type Output = ValidationResult;

    const NAME: &'static str = "cart-validation";

    #[instrument(skip_all, fields(lines = input.cart.lines.len(), policy = %self.policy))]
    fn run(&self, input: Input) -> Result<ValidationResult, FunctionError> {
        let value = input
            .validation
            .value()
            .ok_or(ConfigurationError::MissingConfiguration("validation"))?;
        let limits = QuantityLimits::parse(value, self.policy)?;

        let errors = validate(&input.cart, &limits);
        debug!(
            limits = limits.len(),
            errors = errors.len(),
            "Evaluated quantity limits"
        );

        Ok(ValidationResult { errors })
    }
}
