//! Schema type definitions
//!
//! Supported field kinds:
//! - string: UTF-8 string
//! - number: any JSON number (integer or float)
//! - bool: Boolean
//! - object: Nested object with its own schema
//! - array: Homogeneous array of primitives, objects or custom values
//! - custom: Caller-supplied resolver
//!
//! Arrays of arrays are not representable: `ElementKind` has no array
//! variant and carries no optional flag.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

/// Boxed error returned by a custom resolver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Primitive kinds a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// UTF-8 string
    String,
    /// JSON number
    Number,
    /// Boolean
    Bool,
}

impl PrimitiveKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Bool => "bool",
        }
    }

    /// Returns true if `value` has exactly this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveKind::String => value.is_string(),
            PrimitiveKind::Number => value.is_number(),
            PrimitiveKind::Bool => value.is_boolean(),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

type ResolverFn = dyn Fn(&Value, &str) -> Result<Value, BoxError> + Send + Sync;

/// Caller-supplied check for a custom field.
///
/// The resolver receives the value and its qualified key path. It must
/// either fail or hand back a value equal to the one it received.
#[derive(Clone)]
pub struct Resolver(Arc<ResolverFn>);

impl Resolver {
    /// Wraps a resolver closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the resolver.
    pub fn resolve(&self, value: &Value, key_path: &str) -> Result<Value, BoxError> {
        (self.0)(value, key_path)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

/// Kind of each element of an array field.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Primitive element
    Primitive(PrimitiveKind),
    /// Object element validated against a nested schema
    Object(Schema),
    /// Element checked by a resolver
    Custom(Resolver),
}

impl ElementKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Primitive(kind) => kind.type_name(),
            ElementKind::Object(_) => "object",
            ElementKind::Custom(_) => "custom",
        }
    }
}

impl From<PrimitiveKind> for ElementKind {
    fn from(kind: PrimitiveKind) -> Self {
        ElementKind::Primitive(kind)
    }
}

impl From<Schema> for ElementKind {
    fn from(schema: Schema) -> Self {
        ElementKind::Object(schema)
    }
}

impl From<Resolver> for ElementKind {
    fn from(resolver: Resolver) -> Self {
        ElementKind::Custom(resolver)
    }
}

/// Kind of a schema field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Primitive value
    Primitive(PrimitiveKind),
    /// Nested object
    Object(Schema),
    /// Homogeneous array
    Array(ElementKind),
    /// Resolver-checked value
    Custom(Resolver),
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Primitive(kind) => kind.type_name(),
            FieldKind::Object(_) => "object",
            FieldKind::Array(_) => "array",
            FieldKind::Custom(_) => "custom",
        }
    }
}

/// One field of a schema: its kind plus whether it may be absent.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    kind: FieldKind,
    optional: bool,
}

impl FieldSpec {
    /// Create a required field of the given kind
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    /// Marks the field optional
    pub fn optional(self) -> Self {
        self.with_optional(true)
    }

    /// Sets optionality explicitly
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Create a required primitive field
pub fn field(kind: PrimitiveKind) -> FieldSpec {
    FieldSpec::new(FieldKind::Primitive(kind))
}

/// Create a required string field
pub fn string() -> FieldSpec {
    field(PrimitiveKind::String)
}

/// Create a required number field
pub fn number() -> FieldSpec {
    field(PrimitiveKind::Number)
}

/// Create a required bool field
pub fn boolean() -> FieldSpec {
    field(PrimitiveKind::Bool)
}

/// Create a required object field
pub fn object_field(schema: Schema) -> FieldSpec {
    FieldSpec::new(FieldKind::Object(schema))
}

/// Create a required array field
pub fn array_field(element: impl Into<ElementKind>) -> FieldSpec {
    FieldSpec::new(FieldKind::Array(element.into()))
}

/// Create a required custom field
pub fn custom_field<F>(resolver: F) -> FieldSpec
where
    F: Fn(&Value, &str) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    FieldSpec::new(FieldKind::Custom(Resolver::new(resolver)))
}

/// Ordered mapping from field name to field spec.
///
/// Fields are checked in declaration order. Re-declaring a name replaces
/// its spec in place.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldSpec>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Adds or replaces a field
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        self.fields.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldSpec)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, FieldSpec)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, spec) in iter {
            schema.insert(name, spec);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_keep_declaration_order() {
        let schema = Schema::new()
            .field("zeta", string())
            .field("alpha", number())
            .field("mid", boolean());

        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let schema = Schema::new()
            .field("a", string())
            .field("b", string())
            .field("a", number().optional());

        assert_eq!(schema.len(), 2);
        let (first, spec) = schema.iter().next().unwrap();
        assert_eq!(first, "a");
        assert!(spec.is_optional());
        assert_eq!(spec.kind().type_name(), "number");
    }

    #[test]
    fn test_constructors_default_to_required() {
        assert!(!string().is_optional());
        assert!(!object_field(Schema::new().field("x", string())).is_optional());
        assert!(!array_field(PrimitiveKind::Bool).is_optional());
        assert!(!custom_field(|v, _| Ok(v.clone())).is_optional());
        assert!(string().with_optional(true).is_optional());
    }

    #[test]
    fn test_primitive_matching_is_exact() {
        assert!(PrimitiveKind::String.matches(&json!("1")));
        assert!(!PrimitiveKind::String.matches(&json!(1)));
        assert!(PrimitiveKind::Number.matches(&json!(1.5)));
        assert!(!PrimitiveKind::Number.matches(&json!("1.5")));
        assert!(!PrimitiveKind::Bool.matches(&json!(0)));
        assert!(PrimitiveKind::Bool.matches(&json!(false)));
    }

    #[test]
    fn test_element_kind_conversions() {
        let nested = Schema::new().field("id", string());
        assert_eq!(ElementKind::from(PrimitiveKind::Number).type_name(), "number");
        assert_eq!(ElementKind::from(nested).type_name(), "object");
        let resolver = Resolver::new(|v, _| Ok(v.clone()));
        assert_eq!(ElementKind::from(resolver).type_name(), "custom");
    }

    #[test]
    fn test_schema_from_iterator() {
        let schema: Schema = vec![("a", string()), ("b", number())].into_iter().collect();
        assert!(schema.contains_key("a"));
        assert!(schema.contains_key("b"));
        assert!(!schema.contains_key("c"));
    }
}
