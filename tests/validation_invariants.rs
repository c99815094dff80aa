//! Validation Invariant Tests
//!
//! - An exactly matching tree is returned unchanged
//! - Required mismatches fail; optional mismatches are dropped with a warning
//! - Undeclared keys are pruned
//! - Numbers pass through the coercion hook
//! - Validation is deterministic and does not mutate its input

use std::sync::Arc;

use serde_json::{json, Value};
use structpath::schema::{CompiledSchema, FieldDecl, FieldType, KeyType, ObjectSchema, SchemaCompiler};
use structpath::validation::{FixedPoint, MismatchKind, ValidationError, Validator};

// =============================================================================
// Helper Functions
// =============================================================================

fn compiled() -> CompiledSchema {
    let project = ObjectSchema::new("Project")
        .field(FieldDecl::string("name").required())
        .field(FieldDecl::float("budget"))
        .field(FieldDecl::list("tags", Some(FieldType::String)))
        .shared();
    let schema: Arc<ObjectSchema> = ObjectSchema::new("User")
        .field(FieldDecl::string("id").required())
        .field(FieldDecl::int("age"))
        .field(FieldDecl::bool("active"))
        .field(FieldDecl::map("settings"))
        .field(FieldDecl::dict("projects", FieldType::object(project)).key_name("projectId"))
        .field(FieldDecl::new("levels", FieldType::dict_keyed(KeyType::Int, FieldType::String)))
        .shared();
    SchemaCompiler::default().compile("users", &schema).unwrap()
}

fn full_record() -> Value {
    json!({
        "id": "u1",
        "age": 30,
        "active": true,
        "settings": {"theme": "dark", "sizes": [1, 2]},
        "projects": {
            "p1": {"name": "Foo", "budget": 10.5, "tags": ["a", "b"]},
            "p2": {"name": "Bar"}
        },
        "levels": {"1": "bronze", "2": "silver"}
    })
}

// =============================================================================
// Exact Match Tests
// =============================================================================

/// A tree matching the schema exactly is accepted unchanged.
#[test]
fn test_exact_match_unchanged() {
    let compiled = compiled();
    let result = Validator::default()
        .validate_record(&full_record(), &compiled)
        .unwrap();

    assert!(result.accepted());
    assert!(result.warnings.is_empty());
    assert_eq!(result.value, Some(full_record()));
}

/// Repeated validation gives identical results.
#[test]
fn test_validation_is_deterministic() {
    let compiled = compiled();
    let mut record = full_record();
    record["age"] = json!("thirty");
    record["projects"]["p1"]["extra"] = json!(1);

    let first = Validator::default().validate_record(&record, &compiled).unwrap();
    for _ in 0..50 {
        assert_eq!(Validator::default().validate_record(&record, &compiled).unwrap(), first);
    }
}

// =============================================================================
// Required vs Optional Tests
// =============================================================================

/// A required field with the wrong type fails the whole operation.
#[test]
fn test_required_mismatch_fails() {
    let compiled = compiled();
    let mut record = full_record();
    record["id"] = json!(["u1"]);

    let err = Validator::default().validate_record(&record, &compiled).unwrap_err();
    assert!(matches!(err, ValidationError::RequiredFieldInvalid(_)));
    assert_eq!(err.details().field, "id");
    assert_eq!(err.details().expected, "string");
    assert_eq!(err.details().actual, "list");
}

/// An optional field with the wrong type is dropped; its parent is accepted.
#[test]
fn test_optional_mismatch_dropped() {
    let compiled = compiled();
    let mut record = full_record();
    record["age"] = json!("thirty");

    let result = Validator::default().validate_record(&record, &compiled).unwrap();
    let value = result.value.unwrap();
    assert!(value.get("age").is_none());
    assert_eq!(value["id"], json!("u1"));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].field, "age");
    assert_eq!(result.warnings[0].kind, MismatchKind::TypeMismatch);
}

/// A required field missing from a collection item fails.
#[test]
fn test_missing_required_in_item() {
    let compiled = compiled();
    let mut record = full_record();
    record["projects"]["p2"] = json!({"budget": 1.0});

    let err = Validator::default().validate_record(&record, &compiled).unwrap_err();
    assert!(matches!(err, ValidationError::RequiredFieldMissing(_)));
    assert_eq!(err.details().field, "projects.p2.name");
}

// =============================================================================
// Pruning Tests
// =============================================================================

/// Validating {p1: {name: Foo, extra: 1}} against projects yields {p1: {name: Foo}}.
#[test]
fn test_collection_item_pruned() {
    let compiled = compiled();
    let descriptor = compiled.registry().get("projects").unwrap();

    let result = Validator::default()
        .validate(&json!({"p1": {"name": "Foo", "extra": 1}}), descriptor)
        .unwrap();
    assert!(result.accepted());
    assert_eq!(result.value, Some(json!({"p1": {"name": "Foo"}})));
    assert_eq!(result.warnings[0].kind, MismatchKind::UnknownField);
}

/// Collection keys that fail the key type are dropped.
#[test]
fn test_key_type_pruned() {
    let compiled = compiled();
    let descriptor = compiled.registry().get("levels").unwrap();

    let result = Validator::default()
        .validate(&json!({"1": "bronze", "gold": "x"}), descriptor)
        .unwrap();
    assert_eq!(result.value, Some(json!({"1": "bronze"})));
    assert_eq!(result.warnings[0].kind, MismatchKind::KeyTypeMismatch);
}

/// A single collection item validates against its item descriptor.
#[test]
fn test_item_descriptor() {
    let compiled = compiled();
    let descriptor = compiled.registry().get("projects.{{projectId}}").unwrap();

    let result = Validator::default()
        .validate(&json!({"name": "Foo", "tags": ["a", 3]}), descriptor)
        .unwrap();
    assert_eq!(result.value, Some(json!({"name": "Foo", "tags": ["a"]})));
    assert_eq!(result.warnings[0].field, "projects.{{projectId}}.tags[1]");

    let rejected = Validator::default().validate(&json!("Foo"), descriptor).unwrap();
    assert!(!rejected.accepted());
}

// =============================================================================
// Coercion Tests
// =============================================================================

/// Numbers are passed through the coercion hook, including untyped contents.
#[test]
fn test_numbers_coerced() {
    let compiled = compiled();
    let coercion = FixedPoint::new(0);
    let validator = Validator::new(&coercion);

    let mut record = full_record();
    record["projects"]["p1"]["budget"] = json!(10.6);
    record["settings"] = json!({"ratio": 0.4});

    let value = validator.validate_record(&record, &compiled).unwrap().value.unwrap();
    assert_eq!(value["projects"]["p1"]["budget"], json!(11));
    assert_eq!(value["settings"]["ratio"], json!(0));
    assert_eq!(value["age"], json!(30));
}

/// Validation never modifies the input tree.
#[test]
fn test_input_not_mutated() {
    let compiled = compiled();
    let mut record = full_record();
    record["unknown"] = json!({"deep": [1, 2, 3]});
    let before = record.clone();

    let coercion = FixedPoint::new(0);
    let _ = Validator::new(&coercion).validate_record(&record, &compiled);
    assert_eq!(record, before);
}
