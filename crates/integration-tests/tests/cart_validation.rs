//! Integration tests for quantity-limit cart validation.
//!
//! Payloads go through `FunctionKind::run`, the same path the CLI uses.

use cart_rules_functions::cart_validation::LimitPolicy;
use cart_rules_functions::{ConfigurationError, FunctionError, FunctionKind, FunctionSettings};
use cart_rules_integration_tests::{
    collection, error_messages, validation_line, validation_payload,
};
use serde_json::{Value, json};

fn run(payload: &str) -> Value {
    FunctionKind::CartValidation
        .run(payload, FunctionSettings::default())
        .expect("validation should succeed")
}

fn run_strict(payload: &str) -> Result<Value, FunctionError> {
    FunctionKind::CartValidation.run(
        payload,
        FunctionSettings {
            limit_policy: LimitPolicy::Strict,
        },
    )
}

// ============================================================================
// Checkout Scenarios
// ============================================================================

#[test]
fn test_quantity_equal_to_limit() {
    let output = run(&validation_payload(
        &[(1, json!(5))],
        &[validation_line(5, &[1])],
    ));
    assert_eq!(output, json!({"errors": []}));
}

#[test]
fn test_quantity_one_over_limit() {
    let output = run(&validation_payload(
        &[(1, json!(5))],
        &[validation_line(6, &[1])],
    ));
    assert_eq!(
        output,
        json!({"errors": [{
            "localizedMessage": "Cannot order more than 5 of the product",
            "target": "cart"
        }]})
    );
}

#[test]
fn test_only_exceeded_collection_reported() {
    let output = run(&validation_payload(
        &[(1, json!(5)), (2, json!(2))],
        &[validation_line(3, &[1, 2])],
    ));
    assert_eq!(
        error_messages(&output),
        vec!["Cannot order more than 2 of the product"]
    );
}

#[test]
fn test_empty_mapping_allows_everything() {
    let output = run(&validation_payload(
        &[],
        &[validation_line(1000, &[1, 2, 3]), validation_line(1, &[])],
    ));
    assert!(error_messages(&output).is_empty());
}

#[test]
fn test_unrelated_collection_unrestricted() {
    let output = run(&validation_payload(
        &[(1, json!(5))],
        &[validation_line(10, &[9])],
    ));
    assert!(error_messages(&output).is_empty());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_two_exceeded_collections_two_errors_in_membership_order() {
    let output = run(&validation_payload(
        &[(1, json!(4)), (2, json!(2))],
        &[validation_line(5, &[2, 1])],
    ));
    assert_eq!(
        error_messages(&output),
        vec![
            "Cannot order more than 2 of the product",
            "Cannot order more than 4 of the product",
        ]
    );
}

#[test]
fn test_line_verdicts_independent_of_other_lines() {
    let limits = [(1, json!(3)), (2, json!(1))];
    let over = validation_line(4, &[1]);
    let fine = validation_line(1, &[2]);
    let other_over = validation_line(2, &[2]);

    let alone = run(&validation_payload(&limits, std::slice::from_ref(&over)));
    let with_fine = run(&validation_payload(&limits, &[fine.clone(), over.clone()]));
    let reordered = run(&validation_payload(&limits, &[over.clone(), fine]));
    assert_eq!(error_messages(&alone), error_messages(&with_fine));
    assert_eq!(error_messages(&alone), error_messages(&reordered));

    let both = run(&validation_payload(&limits, &[other_over, over]));
    assert_eq!(
        error_messages(&both),
        vec![
            "Cannot order more than 1 of the product",
            "Cannot order more than 3 of the product",
        ]
    );
}

#[test]
fn test_repeated_runs_identical() {
    let payload = validation_payload(
        &[(1, json!("2")), (2, json!(1))],
        &[validation_line(3, &[1, 2]), validation_line(2, &[2])],
    );
    let first = run(&payload);
    let second = run(&payload);
    assert_eq!(first, second);
    assert_eq!(error_messages(&first).len(), 3);
}

#[test]
fn test_string_and_number_quantities_equivalent() {
    let lines = [validation_line(4, &[1])];
    let as_string = run(&validation_payload(&[(1, json!("3"))], &lines));
    let as_number = run(&validation_payload(&[(1, json!(3))], &lines));
    assert_eq!(as_string, as_number);
}

#[test]
fn test_non_member_answers_ignored() {
    let payload = json!({
        "cart": {"lines": [{
            "quantity": 50,
            "merchandise": {"product": {"inCollections": [
                {"collectionId": collection(1), "isMember": false}
            ]}}
        }]},
        "validation": {"metafield": {"value": json!({"mapping": [
            {"collection": collection(1), "qty": "1"}
        ]}).to_string()}}
    });
    assert!(error_messages(&run(&payload.to_string())).is_empty());
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[test]
fn test_malformed_limit_skipped_when_lenient() {
    let payload = validation_payload(
        &[(1, json!("ten")), (2, json!(1))],
        &[validation_line(5, &[1, 2])],
    );
    assert_eq!(
        error_messages(&run(&payload)),
        vec!["Cannot order more than 1 of the product"]
    );
}

#[test]
fn test_malformed_limit_rejected_when_strict() {
    let payload = validation_payload(&[(1, json!("ten"))], &[validation_line(5, &[1])]);
    let result = run_strict(&payload);
    assert!(matches!(
        result,
        Err(FunctionError::Configuration(ConfigurationError::MalformedLimit { .. }))
    ));
}

#[test]
fn test_duplicate_collection_rejected() {
    let payload = validation_payload(
        &[(1, json!(5)), (1, json!(2))],
        &[validation_line(3, &[1])],
    );
    let result = FunctionKind::CartValidation.run(&payload, FunctionSettings::default());
    assert!(matches!(
        result,
        Err(FunctionError::Configuration(ConfigurationError::DuplicateCollection(_)))
    ));
}

#[test]
fn test_unparsable_configuration_rejected() {
    let payload = json!({
        "cart": {"lines": [validation_line(1, &[1])]},
        "validation": {"metafield": {"value": "mapping: none"}}
    });
    let result = FunctionKind::CartValidation.run(&payload.to_string(), FunctionSettings::default());
    assert!(matches!(
        result,
        Err(FunctionError::Configuration(ConfigurationError::Parse(_)))
    ));
}

#[test]
fn test_configuration_without_mapping_rejected() {
    let payload = json!({
        "cart": {"lines": []},
        "validation": {"metafield": {"value": "{}"}}
    });
    let result = FunctionKind::CartValidation.run(&payload.to_string(), FunctionSettings::default());
    assert!(matches!(
        result,
        Err(FunctionError::Configuration(ConfigurationError::MissingMapping))
    ));
}

#[test]
fn test_missing_validation_rejected() {
    let payload = json!({"cart": {"lines": []}});
    let result = FunctionKind::CartValidation.run(&payload.to_string(), FunctionSettings::default());
    assert!(matches!(
        result,
        Err(FunctionError::Configuration(
            ConfigurationError::MissingConfiguration(_)
        ))
    ));
}
