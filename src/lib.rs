//! shapeguard - Validate dynamic values against declared shapes
//!
//! Build a [`Schema`] from field constructors (or load one from a JSON
//! definition with [`SchemaLoader`]), then call [`validate`]:
//!
//! ```
//! use serde_json::json;
//! use shapeguard::{array_field, number, object_field, string, validate};
//! use shapeguard::{PrimitiveKind, Schema, ValidateOptions};
//!
//! let schema = Schema::new()
//!     .field("name", string())
//!     .field("profile", object_field(Schema::new().field("age", number())))
//!     .field("tags", array_field(PrimitiveKind::String).optional());
//!
//! let err = validate(
//!     &schema,
//!     json!({ "name": "Ada", "profile": { "age": "old" } }),
//!     &ValidateOptions::default(),
//! )
//! .unwrap_err();
//! assert_eq!(err.key_path(), Some("profile.age"));
//! ```

pub mod cli;
pub mod schema;

pub use schema::{
    array_field, boolean, custom_field, field, number, object_field, string, validate, BoxError,
    ClassifiedError, ElementKind, Error, FieldKind, FieldSpec, PrimitiveKind, Resolver, Result,
    Schema, SchemaLoader, SchemaValidator, Severity, ValidateOptions, ValidationError,
};
