//! Validate a merchant configuration value before it is saved.
//!
//! The input is the metafield value exactly as it would be stored, e.g.
//! `{"mapping": [{"collection": "gid://shopify/Collection/1", "qty": "5"}]}`
//! for `cart-validation`. Quantity limits are checked strictly: a value
//! the function would skip at checkout is an error here.
//!
//! # Usage
//!
//! ```bash
//! cart-rules check-config cart-validation --config limits.json
//! ```

use std::path::Path;

use cart_rules_functions::FunctionKind;
use tracing::info;

use super::{CommandError, read_source, write_stdout};

/// Read the configuration value, validate it and print one line per rule.
///
/// # Errors
///
/// Returns an error if the value cannot be read or is invalid.
pub fn execute(function: FunctionKind, config: Option<&Path>) -> Result<(), CommandError> {
    let value = read_source(config)?;
    let rules = function.describe_configuration(value.trim())?;

    info!(%function, rules = rules.len(), "Configuration is valid");
    write_stdout(&render(&rules))
}

fn render(rules: &[String]) -> String {
    if rules.is_empty() {
        return "no rules configured".to_string();
    }
    rules.join("\n")
}
