//! Cart Rules Core - Shared types library.
//!
//! This crate provides the common types used by the checkout functions:
//! - `functions` - Rule evaluators invoked by the platform at checkout
//! - `cli` - Command-line runner for function payloads and configuration
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no host payload parsing,
//! no logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for global IDs, money and percentages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
