//! Integration tests for Cart Rules.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-rules-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_validation` - Quantity limits through the host adapter
//! - `discounts` - Tiered and threshold discount payloads
//! - `payment_customization` - Payment method hiding payloads
//!
//! Every test drives a function exactly as the host does: a JSON payload
//! in, a JSON result out. This module holds the payload builders.

use serde_json::{Value, json};

/// A collection global ID.
#[must_use]
pub fn collection(id: u64) -> String {
    format!("gid://shopify/Collection/{id}")
}

/// A validation cart line whose product is a member of `collections`.
#[must_use]
pub fn validation_line(quantity: i64, collections: &[u64]) -> Value {
    json!({
        "quantity": quantity,
        "merchandise": {"product": {"inCollections": memberships(collections)}}
    })
}

/// A full validation payload; `limits` pairs a collection with its `qty`.
#[must_use]
pub fn validation_payload(limits: &[(u64, Value)], lines: &[Value]) -> String {
    let mapping: Vec<Value> = limits
        .iter()
        .map(|(id, qty)| json!({"collection": collection(*id), "qty": qty}))
        .collect();

    json!({
        "cart": {"lines": lines},
        "validation": {"metafield": {"value": json!({"mapping": mapping}).to_string()}}
    })
    .to_string()
}

/// A discount cart line for a product variant.
#[must_use]
pub fn discount_line(id: u64, quantity: i64, amount: &str, collections: &[u64]) -> Value {
    json!({
        "id": format!("gid://shopify/CartLine/{id}"),
        "quantity": quantity,
        "cost": {"amountPerQuantity": {"amount": amount, "currencyCode": "EUR"}},
        "merchandise": {
            "__typename": "ProductVariant",
            "id": format!("gid://shopify/ProductVariant/{id}"),
            "product": {"inCollections": memberships(collections)}
        }
    })
}

/// A discount payload; `config` becomes the discount node metafield value.
#[must_use]
pub fn discount_payload(config: Option<&Value>, lines: &[Value]) -> String {
    let mut payload = json!({"cart": {"lines": lines}});
    if let Some(config) = config {
        payload["discountNode"] = json!({"metafield": {"value": config.to_string()}});
    }
    payload.to_string()
}

/// Error messages from a validation result.
#[must_use]
pub fn error_messages(output: &Value) -> Vec<String> {
    output["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["localizedMessage"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn memberships(collections: &[u64]) -> Vec<Value> {
    collections
        .iter()
        .map(|id| json!({"collectionId": collection(*id), "isMember": true}))
        .collect()
}
