//! Payment method customization.
//!
//! Cash on delivery is hidden by default and only offered to customers who
//! carry one of the tags selected by the input query. The payment method
//! to hide can be overridden on the customization's metafield:
//!
//! ```json
//! {"paymentMethodId": "gid://shopify/PaymentCustomizationPaymentMethod/3"}
//! ```

use cart_rules_core::PaymentMethodId;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ConfigurationError, FunctionError};
use crate::function::CheckoutFunction;
use crate::types::ConfigurationNode;

/// Cash on delivery.
const DEFAULT_PAYMENT_METHOD: &str = "gid://shopify/PaymentCustomizationPaymentMethod/3";

/// Host payload for the payment customization extension point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Cart snapshot.
    #[serde(default)]
    pub cart: PaymentCart,
    /// The customization instance carrying optional configuration.
    #[serde(default)]
    pub payment_customization: ConfigurationNode,
}

/// Cart as selected by the payment customization query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCart {
    /// Absent for anonymous checkouts.
    #[serde(default)]
    pub buyer_identity: Option<BuyerIdentity>,
}

/// Who is checking out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerIdentity {
    /// Absent when the buyer is not logged in.
    #[serde(default)]
    pub customer: Option<Customer>,
}

/// Customer tag answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// One answer per tag the input query asked about.
    #[serde(default)]
    pub has_tags: Vec<HasTagResponse>,
}

/// Whether the customer has one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasTagResponse {
    #[serde(default)]
    pub tag: Option<String>,
    pub has_tag: bool,
}

impl Input {
    /// Whether the customer carries any of the queried tags.
    #[must_use]
    pub fn customer_is_tagged(&self) -> bool {
        self.cart
            .buyer_identity
            .as_ref()
            .and_then(|identity| identity.customer.as_ref())
            .is_some_and(|customer| customer.has_tags.iter().any(|t| t.has_tag))
    }
}

/// Customization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentCustomizationConfig {
    /// Payment method hidden from untagged customers.
    pub payment_method_id: PaymentMethodId,
}

impl Default for PaymentCustomizationConfig {
    fn default() -> Self {
        Self {
            payment_method_id: PaymentMethodId::new(DEFAULT_PAYMENT_METHOD),
        }
    }
}

impl PaymentCustomizationConfig {
    /// Parse the customization metafield value; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] if the value is not JSON of the
    /// expected shape.
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(value)?)
    }

    /// Human-readable summary, one line per rule.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        vec![format!(
            "{}: hidden unless the customer is tagged",
            self.payment_method_id
        )]
    }
}

/// Result handed back to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCustomizationResult {
    /// Changes to the payment method list.
    pub operations: Vec<Operation>,
}

/// A change to the payment method list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Hide(HideOperation),
}

/// Hide one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HideOperation {
    pub payment_method_id: PaymentMethodId,
}

/// The payment method customization function.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCustomization;

impl CheckoutFunction for PaymentCustomization {
    type Input = Input;
    type Output = PaymentCustomizationResult;

    const NAME: &'static str = "payment-customization";

    #[instrument(skip_all)]
    fn run(&self, input: Input) -> Result<PaymentCustomizationResult, FunctionError> {
        if input.customer_is_tagged() {
            debug!("Customer is tagged, payment methods unchanged");
            return Ok(PaymentCustomizationResult::default());
        }

        let config = match input.payment_customization.value() {
            Some(value) => PaymentCustomizationConfig::parse(value)?,
            None => PaymentCustomizationConfig::default(),
        };
        debug!(payment_method = %config.payment_method_id, "Hiding payment method");

        Ok(PaymentCustomizationResult {
            operations: vec![Operation::Hide(HideOperation {
                payment_method_id: config.payment_method_id,
            })],
        })
    }
}
