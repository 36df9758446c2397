//! Schema loader for declarative JSON schema definitions
//!
//! Definition format:
//!
//! ```json
//! { "fields": {
//!     "name": { "type": "string" },
//!     "age":  { "type": "number", "optional": true },
//!     "home": { "type": "object", "fields": { "city": { "type": "string" } } },
//!     "tags": { "type": "array", "element": { "type": "string" } },
//!     "mail": { "type": "custom", "resolver": "email" } } }
//! ```
//!
//! Custom fields name a resolver registered on the loader. Field order in
//! the loaded schema follows the document.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::errors::{Error, Result};
use super::validator::make_path;
use super::types::{BoxError, ElementKind, FieldKind, FieldSpec, PrimitiveKind, Resolver, Schema};

/// Key path reported for problems with the document as a whole.
const DEFINITION_ROOT: &str = "$definition";

/// One field entry of a definition document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDefinition {
    #[serde(rename = "type")]
    kind: String,
    optional: Option<bool>,
    fields: Option<Map<String, Value>>,
    element: Option<Value>,
    resolver: Option<String>,
}

impl FieldDefinition {
    fn parse(raw: &Value, path: &str) -> Result<Self> {
        let def = FieldDefinition::deserialize(raw)
            .map_err(|e| Error::malformed(path, e.to_string()))?;
        def.check_keys(path)?;
        Ok(def)
    }

    /// Rejects kind-specific keys on a field of another kind.
    fn check_keys(&self, path: &str) -> Result<()> {
        let stray = [
            ("fields", self.fields.is_some(), "object"),
            ("element", self.element.is_some(), "array"),
            ("resolver", self.resolver.is_some(), "custom"),
        ];
        for (key, present, owner) in stray {
            if present && self.kind != owner {
                return Err(Error::malformed(
                    path,
                    format!("'{}' is only allowed on {} fields, not '{}'", key, owner, self.kind),
                ));
            }
        }
        Ok(())
    }
}

/// Builds schemas from definition documents.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    /// Resolvers available to custom fields, by name
    resolvers: HashMap<String, Resolver>,
}

impl SchemaLoader {
    /// Creates a loader with no resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named resolver, builder style.
    pub fn with_resolver<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&Value, &str) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.register_resolver(name, Resolver::new(resolver));
        self
    }

    /// Registers a named resolver, replacing any previous one with that name.
    pub fn register_resolver(&mut self, name: impl Into<String>, resolver: Resolver) {
        self.resolvers.insert(name.into(), resolver);
    }

    /// Loads a definition file.
    pub fn load_file(&self, path: &Path) -> Result<Schema> {
        debug!(path = %path.display(), "loading schema definition");
        let text = fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Loads a definition from JSON text.
    pub fn load_str(&self, text: &str) -> Result<Schema> {
        let value: Value = serde_json::from_str(text)?;
        self.load_value(&value)
    }

    /// Loads an already parsed definition.
    pub fn load_value(&self, definition: &Value) -> Result<Schema> {
        let fields = definition
            .as_object()
            .and_then(|obj| obj.get("fields"))
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Error::malformed(DEFINITION_ROOT, "definition must be an object with 'fields'")
            })?;

        self.build_schema(fields, "")
    }

    fn build_schema(&self, fields: &Map<String, Value>, path: &str) -> Result<Schema> {
        let mut schema = Schema::new();
        for (name, raw) in fields {
            let field_path = make_path(path, name);
            schema.insert(name.as_str(), self.build_field(raw, &field_path)?);
        }
        Ok(schema)
    }

    fn build_field(&self, raw: &Value, path: &str) -> Result<FieldSpec> {
        let def = FieldDefinition::parse(raw, path)?;

        let kind = if def.kind == "array" {
            let element = def
                .element
                .as_ref()
                .ok_or_else(|| Error::malformed(path, "array field without 'element'"))?;
            FieldKind::Array(self.build_element(element, &format!("{}[]", path))?)
        } else {
            match self.build_scalar(&def, path)? {
                ElementKind::Primitive(primitive) => FieldKind::Primitive(primitive),
                ElementKind::Object(schema) => FieldKind::Object(schema),
                ElementKind::Custom(resolver) => FieldKind::Custom(resolver),
            }
        };

        Ok(FieldSpec::new(kind).with_optional(def.optional.unwrap_or(false)))
    }

    fn build_element(&self, raw: &Value, path: &str) -> Result<ElementKind> {
        let def = FieldDefinition::parse(raw, path)?;
        if def.optional.is_some() {
            return Err(Error::malformed(path, "array elements cannot declare 'optional'"));
        }
        if def.kind == "array" {
            return Err(Error::malformed(path, "arrays of arrays are not supported"));
        }
        self.build_scalar(&def, path)
    }

    /// Builds any kind except array.
    fn build_scalar(&self, def: &FieldDefinition, path: &str) -> Result<ElementKind> {
        match def.kind.as_str() {
            "string" => Ok(PrimitiveKind::String.into()),
            "number" => Ok(PrimitiveKind::Number.into()),
            "bool" | "boolean" => Ok(PrimitiveKind::Bool.into()),
            "object" => {
                let fields = def
                    .fields
                    .as_ref()
                    .filter(|fields| !fields.is_empty())
                    .ok_or_else(|| Error::malformed(path, "object field without nested 'fields'"))?;
                Ok(self.build_schema(fields, path)?.into())
            }
            "custom" => {
                let name = def
                    .resolver
                    .as_deref()
                    .ok_or_else(|| Error::malformed(path, "custom field without 'resolver'"))?;
                let resolver = self.resolvers.get(name).cloned().ok_or_else(|| {
                    Error::malformed(path, format!("unknown resolver '{}'", name))
                })?;
                Ok(resolver.into())
            }
            other => Err(Error::malformed(path, format!("unknown field type '{}'", other))),
        }
    }
}
