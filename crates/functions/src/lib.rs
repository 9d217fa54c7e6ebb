//! Cart Rules Functions - checkout rule evaluators.
//!
//! Every function here is invoked by the commerce platform at a fixed
//! checkout extension point. Each one is a pure transform from an immutable
//! host payload (cart snapshot plus merchant configuration) to an output
//! payload; none of them performs I/O or keeps state between calls.
//!
//! # Functions
//!
//! - [`cart_validation`] - Blocks checkout when a line exceeds the quantity
//!   limit of a collection it belongs to
//! - [`discounts::tiered`] - Subtotal tiers unlocking a per-product discount
//! - [`discounts::threshold`] - Percentage off a collection above a cart total
//! - [`payment_customization`] - Hides a payment method for untagged customers
//!
//! # Host adapter
//!
//! [`CheckoutFunction`] and [`run_json`] marshal the host's JSON payloads;
//! [`FunctionKind`] names the functions for dispatch.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_validation;
pub mod discounts;
pub mod error;
pub mod function;
pub mod payment_customization;
pub mod types;

pub use error::{ConfigurationError, FunctionError};
pub use function::{CheckoutFunction, FunctionKind, FunctionSettings, run_json, run_value};
