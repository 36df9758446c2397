//! Schema Definition Tests
//!
//! Schemas loaded from definition files behave exactly like schemas built
//! in code:
//! - Validation is deterministic
//! - Field order follows the definition file
//! - Malformed definitions fail to load, never at validation time

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use shapeguard::{validate, Error, SchemaLoader, SchemaValidator, ValidateOptions};

// =============================================================================
// Helper Functions
// =============================================================================

fn write_definition(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn users_loader() -> SchemaLoader {
    SchemaLoader::new().with_resolver("email", |value, key_path| {
        match value.as_str() {
            Some(s) if s.contains('@') => Ok(value.clone()),
            _ => Err(format!("{key_path}: not an email address").into()),
        }
    })
}

const USERS: &str = r#"{
    "fields": {
        "id":    { "type": "string" },
        "email": { "type": "custom", "resolver": "email" },
        "age":   { "type": "number", "optional": true },
        "roles": { "type": "array", "element": { "type": "string" } },
        "address": {
            "type": "object",
            "fields": {
                "city": { "type": "string" },
                "geo": { "type": "object", "optional": true, "fields": {
                    "lat": { "type": "number" },
                    "lng": { "type": "number" }
                } }
            }
        }
    }
}"#;

// =============================================================================
// Validation Determinism Tests
// =============================================================================

/// Same document validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let path = write_definition(&tmp, "users.json", USERS);
    let validator = SchemaValidator::new(users_loader().load_file(&path).unwrap());

    let doc = json!({
        "id": "u1",
        "email": "a@b.c",
        "roles": ["admin"],
        "address": { "city": "Oslo", "geo": { "lat": 59.9, "lng": "10.7" } }
    });

    for _ in 0..100 {
        let err = validator
            .validate(doc.clone(), &ValidateOptions::default())
            .unwrap_err();
        assert_eq!(err.key_path(), Some("address.geo.lng"));
    }
}

// =============================================================================
// Field Order Tests
// =============================================================================

/// The first invalid field in file order is reported.
#[test]
fn test_definition_order_decides_first_failure() {
    let schema = users_loader().load_str(USERS).unwrap();

    let err = validate(
        &schema,
        json!({ "roles": "admin", "id": 7 }),
        &ValidateOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.key_path(), Some("id"));
}

/// Strict mode applies to nested objects of loaded schemas.
#[test]
fn test_strict_nested_unexpected_key() {
    let schema = users_loader().load_str(USERS).unwrap();
    let doc = json!({
        "id": "u1",
        "email": "a@b.c",
        "roles": [],
        "address": { "city": "Oslo", "country": "NO" }
    });

    assert!(validate(&schema, doc.clone(), &ValidateOptions::default()).is_ok());

    let err = validate(&schema, doc, &ValidateOptions::new().strict(true)).unwrap_err();
    assert_eq!(err.code(), "SHAPE_UNEXPECTED_FIELD");
    assert_eq!(err.key_path(), Some("address.country"));
}

/// Named resolvers run with the qualified key path.
#[test]
fn test_named_resolver_failure() {
    let schema = users_loader().load_str(USERS).unwrap();
    let doc = json!({
        "id": "u1",
        "email": "nobody",
        "roles": [],
        "address": { "city": "Oslo" }
    });

    let err = validate(&schema, doc, &ValidateOptions::new().root_key("user")).unwrap_err();
    match err {
        Error::Resolver { key_path, source } => {
            assert_eq!(key_path, "user.email");
            assert_eq!(source.to_string(), "user.email: not an email address");
        }
        other => panic!("expected resolver error, got {other}"),
    }
}

// =============================================================================
// Malformed Definition Tests
// =============================================================================

/// Definitions naming an unregistered resolver fail to load.
#[test]
fn test_missing_resolver_fails_load() {
    let err = SchemaLoader::new().load_str(USERS).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, Error::MalformedSchema { ref key_path, .. } if key_path == "email"));
}

/// Nested object without fields fails to load with its full path.
#[test]
fn test_nested_object_without_fields() {
    let tmp = TempDir::new().unwrap();
    let path = write_definition(
        &tmp,
        "bad.json",
        r#"{"fields": {"a": {"type": "object", "fields": {"b": {"type": "object"}}}}}"#,
    );

    let err = SchemaLoader::new().load_file(&path).unwrap_err();
    assert_eq!(err.code(), "SHAPE_MALFORMED_SCHEMA");
    assert_eq!(err.key_path(), Some("a.b"));
}
