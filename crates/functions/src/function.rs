//! Host adapter: JSON payload in, JSON payload out.
//!
//! The platform hands each function a JSON document shaped by the
//! function's input query and expects a JSON result back. [`run_json`]
//! does that marshalling for any [`CheckoutFunction`]; [`FunctionKind`]
//! names the functions so the CLI can dispatch on a string.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info_span};

use crate::cart_validation::{self, CartValidation, LimitPolicy};
use crate::discounts::{threshold, tiered};
use crate::error::{ConfigurationError, FunctionError};
use crate::payment_customization;

/// A rule function invoked by the host at a checkout extension point.
pub trait CheckoutFunction {
    /// Host payload, as selected by the function's input query.
    type Input: DeserializeOwned;
    /// Result handed back to the host.
    type Output: Serialize;

    /// Name used in logs and on the command line.
    const NAME: &'static str;

    /// Evaluate the rule for one payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the merchant configuration carried by the
    /// payload is invalid.
    fn run(&self, input: Self::Input) -> Result<Self::Output, FunctionError>;
}

/// Run a function on a JSON payload and return the result as a JSON value.
///
/// # Errors
///
/// Returns [`FunctionError::Input`] if the payload does not match the
/// function's input shape, or any error the function itself returns.
pub fn run_value<F: CheckoutFunction>(
    function: &F,
    payload: &str,
) -> Result<serde_json::Value, FunctionError> {
    let span = info_span!("checkout_function", function = F::NAME);
    let _enter = span.enter();

    let input: F::Input = serde_json::from_str(payload).map_err(FunctionError::Input)?;
    let output = function.run(input)?;
    let value = serde_json::to_value(&output).map_err(FunctionError::Output)?;

    debug!(output = %value, "Function completed");
    Ok(value)
}

/// Run a function on a JSON payload and return the serialized result.
///
/// # Errors
///
/// See [`run_value`].
pub fn run_json<F: CheckoutFunction>(function: &F, payload: &str) -> Result<String, FunctionError> {
    let value = run_value(function, payload)?;
    serde_json::to_string(&value).map_err(FunctionError::Output)
}

/// Settings that change how functions evaluate, independent of payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionSettings {
    /// Treatment of malformed quantity limits.
    pub limit_policy: LimitPolicy,
}

/// The functions this crate provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Quantity-limit cart validation.
    CartValidation,
    /// Subtotal tiers unlocking a per-product discount.
    TieredDiscount,
    /// Percentage off a collection above a cart total.
    CollectionDiscount,
    /// Hide a payment method for untagged customers.
    PaymentCustomization,
}

impl FunctionKind {
    /// Command-line name of the function.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CartValidation => CartValidation::NAME,
            Self::TieredDiscount => tiered::TieredDiscount::NAME,
            Self::CollectionDiscount => threshold::CollectionDiscount::NAME,
            Self::PaymentCustomization => payment_customization::PaymentCustomization::NAME,
        }
    }

    /// Run this function on a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`run_value`].
    pub fn run(
        self,
        payload: &str,
        settings: FunctionSettings,
    ) -> Result<serde_json::Value, FunctionError> {
        match self {
            Self::CartValidation => run_value(&CartValidation::new(settings.limit_policy), payload),
            Self::TieredDiscount => run_value(&tiered::TieredDiscount, payload),
            Self::CollectionDiscount => run_value(&threshold::CollectionDiscount, payload),
            Self::PaymentCustomization => {
                run_value(&payment_customization::PaymentCustomization, payload)
            }
        }
    }

    /// Parse a merchant configuration value the way this function would,
    /// returning one human-readable line per accepted rule.
    ///
    /// Quantity limits are parsed with [`LimitPolicy::Strict`] so that
    /// mistakes are caught when the configuration is saved.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn describe_configuration(self, value: &str) -> Result<Vec<String>, ConfigurationError> {
        match self {
            Self::CartValidation => {
                let limits = cart_validation::QuantityLimits::parse(value, LimitPolicy::Strict)?;
                Ok(limits
                    .iter()
                    .map(|limit| {
                        format!(
                            "{}: at most {} per line",
                            limit.collection_id, limit.max_quantity
                        )
                    })
                    .collect())
            }
            Self::TieredDiscount => tiered::TieredDiscountConfig::parse(value).map(|c| c.describe()),
            Self::CollectionDiscount => {
                threshold::CollectionDiscountConfig::parse(value).map(|c| c.describe())
            }
            Self::PaymentCustomization => {
                payment_customization::PaymentCustomizationConfig::parse(value)
                    .map(|c| c.describe())
            }
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
