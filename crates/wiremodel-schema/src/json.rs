// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Draft-04 JSON-Schema writer.
//!
//! Every struct reachable from the root (and from any extra struct added
//! with [`JsonSchemaWriter::with_struct`]) lands in `definitions`, keyed by
//! type name. Struct-typed fields refer to those entries with `$ref`, so
//! recursive types need no special handling. The root object repeats the
//! root definition's properties at the top level.

use serde::Serialize;
use serde_json::{json, Map, Number, Value as Json};
use std::collections::BTreeMap;
use std::fmt;
use std::string::FromUtf8Error;
use std::sync::Arc;
use wiremodel::{FieldDescriptor, Registry, SchemaError, StructSchema, TypeDescriptor, Value};

/// Draft-04 meta-schema URI.
pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// JSON-Schema generation failures.
#[derive(Debug)]
pub enum JsonSchemaError {
    /// A type could not be resolved or frozen.
    Schema(SchemaError),
    /// JSON objects only have string keys.
    UnsupportedMapKey {
        type_name: String,
        field: String,
        key: String,
    },
    /// Rendering the document failed.
    Json(serde_json::Error),
    /// Rendered text was not UTF-8.
    Text(FromUtf8Error),
}

impl fmt::Display for JsonSchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "schema error: {}", e),
            Self::UnsupportedMapKey {
                type_name,
                field,
                key,
            } => write!(
                f,
                "{}.{}: JSON-Schema maps need string keys, found {}",
                type_name, field, key
            ),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Text(e) => write!(f, "rendered schema is not UTF-8: {}", e),
        }
    }
}

impl std::error::Error for JsonSchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Text(e) => Some(e),
            Self::UnsupportedMapKey { .. } => None,
        }
    }
}

impl From<SchemaError> for JsonSchemaError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<serde_json::Error> for JsonSchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Builds a JSON-Schema document for a registered struct type.
#[derive(Debug)]
pub struct JsonSchemaWriter<'r> {
    registry: &'r Registry,
    description: Option<String>,
    extra: Vec<String>,
}

impl<'r> JsonSchemaWriter<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            description: None,
            extra: Vec::new(),
        }
    }

    /// Top-level `description`; `null` when unset.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Also define `name` (and its dependencies) even when the root does
    /// not reach it.
    pub fn with_struct(mut self, name: impl Into<String>) -> Self {
        self.extra.push(name.into());
        self
    }

    /// Schema document as a JSON value.
    pub fn schema_ast(&self, root: &str) -> Result<Json, JsonSchemaError> {
        let mut schemas: BTreeMap<String, Arc<StructSchema>> = BTreeMap::new();
        for name in std::iter::once(root).chain(self.extra.iter().map(String::as_str)) {
            for schema in self.registry.dependencies(name)? {
                schemas.entry(schema.name().to_string()).or_insert(schema);
            }
        }

        let mut definitions = Map::new();
        for (name, schema) in &schemas {
            definitions.insert(name.clone(), Json::Object(struct_definition(schema)?));
        }

        let root_schema = self.registry.schema(root)?;
        let mut document = struct_definition(&root_schema)?;
        document.insert("$schema".into(), Json::from(DRAFT_04));
        document.insert(
            "description".into(),
            self.description.as_deref().map_or(Json::Null, Json::from),
        );
        document.insert("definitions".into(), Json::Object(definitions));

        log::debug!(
            "[json-schema] {}: {} definitions",
            root,
            schemas.len()
        );
        Ok(Json::Object(document))
    }

    /// Schema document rendered with sorted keys and four-space indent.
    pub fn schema_text(&self, root: &str) -> Result<String, JsonSchemaError> {
        let ast = self.schema_ast(root)?;
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        ast.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(JsonSchemaError::Text)
    }
}

fn struct_definition(schema: &StructSchema) -> Result<Map<String, Json>, JsonSchemaError> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in schema.fields() {
        properties.insert(field.name.clone(), field_definition(schema, field)?);
        if field.required {
            required.push(Json::from(field.name.clone()));
        }
    }

    let mut definition = Map::new();
    definition.insert("type".into(), Json::from("object"));
    definition.insert("properties".into(), Json::Object(properties));
    definition.insert("additionalProperties".into(), Json::Bool(true));
    if !required.is_empty() {
        definition.insert("required".into(), Json::Array(required));
    }
    if schema.is_union() {
        definition.insert("maxProperties".into(), Json::from(1));
    }
    Ok(definition)
}

fn field_definition(
    schema: &StructSchema,
    field: &FieldDescriptor,
) -> Result<Json, JsonSchemaError> {
    let mut definition =
        type_definition(&field.ty).map_err(|key| JsonSchemaError::UnsupportedMapKey {
            type_name: schema.name().to_string(),
            field: field.attr_name.clone(),
            key,
        })?;
    if let (Some(default), Json::Object(object)) = (&field.default, &mut definition) {
        object.insert("default".into(), to_json(default));
    }
    Ok(definition)
}

/// Definition of one type. Fails with the offending key type name.
fn type_definition(ty: &TypeDescriptor) -> Result<Json, String> {
    let definition = match ty {
        TypeDescriptor::I64 => json!({ "type": "integer" }),
        TypeDescriptor::Double => json!({ "type": "number" }),
        TypeDescriptor::Bool => json!({ "type": "boolean" }),
        TypeDescriptor::String { binary: false } | TypeDescriptor::Utf8 => {
            json!({ "type": "string" })
        }
        TypeDescriptor::String { binary: true } => {
            json!({ "type": "string", "description": "binary" })
        }
        TypeDescriptor::Struct(target) | TypeDescriptor::Union { target, .. } => {
            json!({ "$ref": format!("#/definitions/{}", target.name()) })
        }
        TypeDescriptor::List(element) | TypeDescriptor::Set(element) => json!({
            "type": "array",
            "items": type_definition(&element.ty)?,
            "uniqueItems": matches!(ty, TypeDescriptor::Set(_)),
        }),
        TypeDescriptor::Map { key, value } => {
            if !matches!(key.ty, TypeDescriptor::String { binary: false } | TypeDescriptor::Utf8) {
                return Err(key.ty.type_name());
            }
            json!({
                "description": ty.type_name(),
                "additionalProperties": type_definition(&value.ty)?,
            })
        }
    };
    Ok(definition)
}

/// JSON rendering of a default value.
fn to_json(value: &Value) -> Json {
    match value {
        Value::Bool(v) => Json::Bool(*v),
        Value::I64(v) => Json::from(*v),
        Value::Double(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
        Value::String(s) => Json::from(s.as_str()),
        Value::Binary(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
        Value::List(items) | Value::Set(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(pairs) => {
            let mut object = Map::new();
            for (k, v) in pairs {
                let key = match k {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                object.insert(key, to_json(v));
            }
            Json::Object(object)
        }
        Value::Struct(model) => {
            let mut object = Map::new();
            for (field, v) in model.iter() {
                object.insert(field.name.clone(), to_json(v));
            }
            Json::Object(object)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_definitions() {
        assert_eq!(type_definition(&TypeDescriptor::I64), Ok(json!({ "type": "integer" })));
        assert_eq!(type_definition(&TypeDescriptor::Utf8), Ok(json!({ "type": "string" })));
        assert_eq!(
            type_definition(&TypeDescriptor::set(TypeDescriptor::Double)),
            Ok(json!({ "type": "array", "items": { "type": "number" }, "uniqueItems": true }))
        );
    }

    #[test]
    fn test_map_needs_string_keys() {
        let ty =
            TypeDescriptor::map(TypeDescriptor::Utf8, TypeDescriptor::list(TypeDescriptor::Bool));
        assert_eq!(
            type_definition(&ty),
            Ok(json!({
                "description": "map<utf8, list<bool>>",
                "additionalProperties": {
                    "type": "array",
                    "items": { "type": "boolean" },
                    "uniqueItems": false
                }
            }))
        );
        let ty = TypeDescriptor::map(TypeDescriptor::I64, TypeDescriptor::Bool);
        assert_eq!(type_definition(&ty), Err("i64".to_string()));
    }

    #[test]
    fn test_default_rendering() {
        assert_eq!(to_json(&Value::list([1i64, 2])), json!([1, 2]));
        assert_eq!(to_json(&Value::map([("a", true)])), json!({ "a": true }));
        assert_eq!(to_json(&Value::Double(f64::NAN)), Json::Null);
    }

    #[test]
    fn test_invalid_text_is_reported() {
        let raw = String::from_utf8(vec![b'{', 0xff, b'}']).expect_err("invalid");
        let err = JsonSchemaError::Text(raw);
        assert!(err.to_string().starts_with("rendered schema is not UTF-8"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
