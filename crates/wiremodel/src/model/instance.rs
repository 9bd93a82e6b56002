// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model instance storage and field access.

use super::ModelError;
use crate::field::{FieldDescriptor, FieldId};
use crate::schema::StructSchema;
use crate::types::{FromValue, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Instance of a struct type: a sparse `field_id -> value` store.
///
/// Access is by attribute name (`get`/`set`/`delete`), by wire name or by
/// id. `set` stores any value; type and validator checks happen in
/// [`Model::validate`].
#[derive(Clone)]
pub struct Model {
    schema: Arc<StructSchema>,
    values: BTreeMap<FieldId, Value>,
}

impl Model {
    /// Create an instance with no field set.
    pub fn new(schema: &Arc<StructSchema>) -> Self {
        Self {
            schema: Arc::clone(schema),
            values: BTreeMap::new(),
        }
    }

    /// Bind values to fields in ascending id order.
    pub fn from_positional<I, V>(schema: &Arc<StructSchema>, values: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.len() > schema.len() {
            return Err(ModelError::TooManyArguments {
                type_name: schema.name().to_string(),
                expected: schema.len(),
                given: values.len(),
            });
        }

        let mut model = Self::new(schema);
        let ids: Vec<FieldId> = schema.iter_by_id().map(|field| field.id).collect();
        for (id, value) in ids.into_iter().zip(values) {
            model.values.insert(id, value);
        }
        Ok(model)
    }

    /// Bind values by attribute name.
    pub fn from_named<I, K, V>(schema: &Arc<StructSchema>, values: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut model = Self::new(schema);
        for (name, value) in values {
            model.set(name.as_ref(), value)?;
        }
        Ok(model)
    }

    /// Set a field and return the instance, for chained construction.
    pub fn with(mut self, attr_name: &str, value: impl Into<Value>) -> Result<Self, ModelError> {
        self.set(attr_name, value)?;
        Ok(self)
    }

    pub fn schema(&self) -> &Arc<StructSchema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Stored value of a field, `None` when unset.
    pub fn get(&self, attr_name: &str) -> Result<Option<&Value>, ModelError> {
        let id = self.resolve(attr_name)?.id;
        Ok(self.values.get(&id))
    }

    /// Stored value converted to `T`.
    pub fn get_as<T: FromValue>(&self, attr_name: &str) -> Result<Option<T>, ModelError> {
        match self.get(attr_name)? {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .map_err(|expected| ModelError::WrongType {
                    type_name: self.type_name().to_string(),
                    field: attr_name.to_string(),
                    expected,
                    found: value.kind_name(),
                }),
        }
    }

    /// Stored value, falling back to the field default.
    pub fn get_or_default(&self, attr_name: &str) -> Result<Option<&Value>, ModelError> {
        let field = self.resolve(attr_name)?;
        Ok(self.values.get(&field.id).or(field.default.as_ref()))
    }

    /// Store a value. No type check is performed here.
    pub fn set(&mut self, attr_name: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        let id = self.resolve(attr_name)?.id;
        self.values.insert(id, value.into());
        Ok(())
    }

    /// Unset a field, returning the removed value. Unsetting an unset field
    /// is a no-op.
    pub fn delete(&mut self, attr_name: &str) -> Result<Option<Value>, ModelError> {
        let id = self.resolve(attr_name)?.id;
        Ok(self.values.remove(&id))
    }

    pub fn is_set(&self, attr_name: &str) -> Result<bool, ModelError> {
        let id = self.resolve(attr_name)?.id;
        Ok(self.values.contains_key(&id))
    }

    /// Stored value of the field with wire name `name`.
    pub fn get_by_wire_name(&self, name: &str) -> Result<Option<&Value>, ModelError> {
        let field = self
            .schema
            .field_by_wire_name(name)
            .ok_or_else(|| self.undefined(name))?;
        Ok(self.values.get(&field.id))
    }

    /// Store a value under the field with wire name `name`.
    pub fn set_by_wire_name(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let id = self
            .schema
            .field_by_wire_name(name)
            .map(|field| field.id)
            .ok_or_else(|| self.undefined(name))?;
        self.values.insert(id, value.into());
        Ok(())
    }

    pub fn value_by_id(&self, id: FieldId) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Store a value by field id.
    pub fn set_by_id(&mut self, id: FieldId, value: impl Into<Value>) -> Result<(), ModelError> {
        if self.schema.field_by_id(id).is_none() {
            return Err(ModelError::UndefinedFieldId {
                type_name: self.type_name().to_string(),
                id,
            });
        }
        self.values.insert(id, value.into());
        Ok(())
    }

    /// Set fields with their descriptors, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> + '_ {
        self.values
            .iter()
            .filter_map(move |(id, value)| self.schema.field_by_id(*id).map(|field| (field, value)))
    }

    /// Number of set fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Unset every field.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub(crate) fn values(&self) -> &BTreeMap<FieldId, Value> {
        &self.values
    }

    /// Store a value under an id the caller took from this schema.
    pub(crate) fn insert_by_id(&mut self, id: FieldId, value: Value) {
        self.values.insert(id, value);
    }

    fn resolve(&self, attr_name: &str) -> Result<&FieldDescriptor, ModelError> {
        self.schema
            .field(attr_name)
            .ok_or_else(|| self.undefined(attr_name))
    }

    fn undefined(&self, name: &str) -> ModelError {
        ModelError::UndefinedField {
            type_name: self.type_name().to_string(),
            field: name.to_string(),
        }
    }
}

/// Equal values over the same table, or over tables with the same field
/// layout (see [`StructSchema::fields_equal`]).
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.schema, &other.schema) || self.schema.fields_equal(&other.schema))
            && self.values == other.values
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        for (index, (field, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field.attr_name, value)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
