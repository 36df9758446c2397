//! Schema validation for dynamic values
//!
//! A `Schema` declares the expected shape of an object. `validate` walks
//! the schema against a `serde_json::Value` and either returns the value
//! or reports the first violation with its fully qualified key path.
//!
//! # Design Principles
//!
//! - Exact kinds, no coercion
//! - Fail fast on the first violation
//! - Bad input and bad schemas are distinct error classes
//! - Schemas are immutable and validators hold no per-call state

mod errors;
mod loader;
mod options;
mod types;
mod validator;

pub use errors::{ClassifiedError, Error, Result, Severity, ValidationError};
pub use loader::SchemaLoader;
pub use options::ValidateOptions;
pub use types::{
    array_field, boolean, custom_field, field, number, object_field, string, BoxError,
    ElementKind, FieldKind, FieldSpec, PrimitiveKind, Resolver, Schema,
};
pub use validator::{validate, SchemaValidator};
