//! Schema validator for dynamic values
//!
//! Validation semantics:
//! - The root value must be an object
//! - Fields are checked in schema declaration order, first failure wins
//! - Required fields must be present and non-null
//! - Optional fields that are absent or null are skipped
//! - Field kinds must match exactly, no coercion
//! - In strict mode, undeclared keys are rejected before any field of
//!   that object is checked
//!
//! Classified failures are collected into a `ValidationError` only at the
//! outermost call. Schema faults and resolver faults pass through as
//! their own `Error` variants.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::errors::{ClassifiedError, Error, Result, ValidationError};
use super::options::ValidateOptions;
use super::types::{ElementKind, FieldKind, PrimitiveKind, Resolver, Schema};

/// Key path reported for a non-object root without a root key.
const ROOT_PATH: &str = "$root";

/// Internal failure while walking a value.
enum Fault {
    /// Bad input, wrapped at the top level
    Data(ClassifiedError),
    /// Bad schema or resolver, passed through unwrapped
    Program(Error),
}

impl From<ClassifiedError> for Fault {
    fn from(err: ClassifiedError) -> Self {
        Fault::Data(err)
    }
}

type WalkResult = std::result::Result<(), Fault>;

/// Validator bound to one schema.
///
/// Holds no per-call state; a single instance can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Schema,
}

impl SchemaValidator {
    /// Creates a validator for the given schema.
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates a value against the bound schema.
    ///
    /// See [`validate`].
    pub fn validate(&self, value: Value, options: &ValidateOptions) -> Result<Value> {
        validate(&self.schema, value, options)
    }

    /// Returns true if a copy of `value` passes validation.
    pub fn is_valid(&self, value: &Value, options: &ValidateOptions) -> bool {
        self.validate(value.clone(), options).is_ok()
    }
}

/// Validates a value against a schema.
///
/// Returns the value on success. Array elements of custom kind are
/// replaced by their resolver's output, which must equal the input.
///
/// # Errors
///
/// - `Error::Validation` when the value does not conform
/// - `Error::MalformedSchema` when an object field declares no fields
/// - `Error::Resolver` when a custom resolver fails
/// - `Error::ResolverContract` when a resolver returns a different value
pub fn validate(schema: &Schema, mut value: Value, options: &ValidateOptions) -> Result<Value> {
    let prefix = options.prefix();
    debug!(
        strict = options.strict,
        root_key = prefix,
        fields = schema.len(),
        "validating value"
    );

    if let Err(err) = check_schema(schema, prefix) {
        debug!(code = err.code(), error = %err, "schema rejected");
        return Err(err);
    }

    let outcome = match &mut value {
        Value::Object(obj) => check_object(schema, obj, prefix, options.strict),
        other => Err(ClassifiedError::type_mismatch(root_path(prefix), "object", other).into()),
    };

    match outcome {
        Ok(()) => Ok(value),
        Err(Fault::Data(cause)) => {
            debug!(code = cause.code(), key_path = cause.key_path(), "value rejected");
            Err(ValidationError::new(cause).into())
        }
        Err(Fault::Program(err)) => {
            debug!(code = err.code(), error = %err, "validation aborted");
            Err(err)
        }
    }
}

/// Rejects nested object schemas that declare no fields.
///
/// Walks the whole schema graph, so the outcome does not depend on which
/// fields the input happens to carry.
fn check_schema(schema: &Schema, prefix: &str) -> Result<()> {
    for (name, spec) in schema.iter() {
        let path = make_path(prefix, name);
        match spec.kind() {
            FieldKind::Object(nested) => check_nested_schema(nested, &path)?,
            FieldKind::Array(ElementKind::Object(nested)) => {
                check_nested_schema(nested, &format!("{}[]", path))?
            }
            FieldKind::Primitive(_) | FieldKind::Array(_) | FieldKind::Custom(_) => {}
        }
    }
    Ok(())
}

fn check_nested_schema(schema: &Schema, path: &str) -> Result<()> {
    if schema.is_empty() {
        return Err(Error::malformed(path, "object field declares no nested fields"));
    }
    check_schema(schema, path)
}

/// Validates every field of one object level.
fn check_object(
    schema: &Schema,
    obj: &mut Map<String, Value>,
    prefix: &str,
    strict: bool,
) -> WalkResult {
    if strict {
        if let Some(key) = obj.keys().find(|key| !schema.contains_key(key)) {
            return Err(ClassifiedError::unexpected_field(make_path(prefix, key), key.as_str()).into());
        }
    }

    for (name, spec) in schema.iter() {
        let key_path = make_path(prefix, name);
        trace!(key_path = %key_path, kind = spec.kind().type_name(), "checking field");

        match obj.get_mut(name) {
            None | Some(Value::Null) if spec.is_optional() => continue,
            None | Some(Value::Null) => {
                return Err(ClassifiedError::non_nullable(key_path).into());
            }
            Some(value) => check_field(spec.kind(), value, &key_path, strict)?,
        }
    }

    Ok(())
}

/// Validates a present, non-null field value.
fn check_field(kind: &FieldKind, value: &mut Value, key_path: &str, strict: bool) -> WalkResult {
    match kind {
        FieldKind::Primitive(primitive) => check_primitive(*primitive, value, key_path),
        FieldKind::Object(schema) => check_nested(schema, value, key_path, strict),
        FieldKind::Array(element) => {
            let items = match value {
                Value::Array(items) => items,
                other => {
                    return Err(ClassifiedError::type_mismatch(key_path, "array", other).into());
                }
            };

            for (i, item) in items.iter_mut().enumerate() {
                let elem_path = format!("{}[{}]", key_path, i);
                check_element(element, item, &elem_path, strict)?;
            }
            Ok(())
        }
        FieldKind::Custom(resolver) => resolve(resolver, value, key_path).map(|_| ()),
    }
}

/// Validates one array element. Elements are always required.
fn check_element(element: &ElementKind, item: &mut Value, elem_path: &str, strict: bool) -> WalkResult {
    if item.is_null() {
        return Err(ClassifiedError::non_nullable(elem_path).into());
    }

    match element {
        ElementKind::Primitive(primitive) => check_primitive(*primitive, item, elem_path),
        ElementKind::Object(schema) => check_nested(schema, item, elem_path, strict),
        ElementKind::Custom(resolver) => {
            *item = resolve(resolver, item, elem_path)?;
            Ok(())
        }
    }
}

fn check_primitive(kind: PrimitiveKind, value: &Value, key_path: &str) -> WalkResult {
    if kind.matches(value) {
        Ok(())
    } else {
        Err(ClassifiedError::type_mismatch(key_path, kind.type_name(), value).into())
    }
}

/// Recurses into a nested object, using `key_path` as the new prefix.
fn check_nested(schema: &Schema, value: &mut Value, key_path: &str, strict: bool) -> WalkResult {
    match value {
        Value::Object(obj) => check_object(schema, obj, key_path, strict),
        other => Err(ClassifiedError::type_mismatch(key_path, "object", other).into()),
    }
}

/// Runs a resolver and enforces that it hands back the value it was given.
fn resolve(resolver: &Resolver, value: &Value, key_path: &str) -> std::result::Result<Value, Fault> {
    let resolved = resolver.resolve(value, key_path).map_err(|source| {
        Fault::Program(Error::Resolver {
            key_path: key_path.to_string(),
            source,
        })
    })?;

    if !same_value(&resolved, value) {
        return Err(Fault::Program(Error::ResolverContract {
            key_path: key_path.to_string(),
        }));
    }

    Ok(resolved)
}

/// Value equality where numbers compare by their floating-point value,
/// so `5` and `5.0` are the same number.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).map_or(false, |y| same_value(x, y)))
        }
        _ => a == b,
    }
}

/// Creates a field path from prefix and field name.
pub(super) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn root_path(prefix: &str) -> &str {
    if prefix.is_empty() {
        ROOT_PATH
    } else {
        prefix
    }
}
