// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance validation.

use super::{Model, ModelError};
use crate::field::FieldDescriptor;
use crate::types::{TypeDescriptor, Value};

impl Model {
    /// Check every field in ascending id order, stopping at the first
    /// failure.
    ///
    /// Per field: the required check, the type check of a set value, the
    /// field validators (which also see unset values), then element
    /// validators of container values. Nested struct values validate
    /// recursively. Union exclusivity and model validators run last.
    pub fn validate(&self) -> Result<(), ModelError> {
        for field in self.schema().iter_by_id() {
            let value = self.values().get(&field.id);
            validate_field(field, value).map_err(|reason| ModelError::Validation {
                type_name: self.type_name().to_string(),
                field: field.attr_name.clone(),
                id: field.id,
                reason,
            })?;
        }

        if self.schema().is_union() && self.len() > 1 {
            let set: Vec<&str> = self.iter().map(|(field, _)| field.attr_name.as_str()).collect();
            return Err(ModelError::ModelValidation {
                type_name: self.type_name().to_string(),
                validator: "union".to_string(),
                reason: format!(
                    "{} fields set ({}), at most one allowed",
                    set.len(),
                    set.join(", ")
                ),
            });
        }

        for validator in self.schema().validators() {
            validator
                .validate(self)
                .map_err(|reason| ModelError::ModelValidation {
                    type_name: self.type_name().to_string(),
                    validator: validator.description().to_string(),
                    reason,
                })?;
        }
        Ok(())
    }
}

fn validate_field(field: &FieldDescriptor, value: Option<&Value>) -> Result<(), String> {
    if field.required && value.is_none() {
        return Err("required field is not set".to_string());
    }
    if let Some(value) = value {
        field.ty.check(value)?;
    }
    for validator in &field.validators {
        validator.validate(value)?;
    }
    match value {
        Some(value) => validate_nested(&field.ty, value),
        None => Ok(()),
    }
}

/// Element validators and nested instances. `value` already matches `ty`.
fn validate_nested(ty: &TypeDescriptor, value: &Value) -> Result<(), String> {
    match (ty, value) {
        (
            TypeDescriptor::List(element) | TypeDescriptor::Set(element),
            Value::List(items) | Value::Set(items),
        ) => items.iter().enumerate().try_for_each(|(index, item)| {
            element
                .validators
                .iter()
                .try_for_each(|validator| validator.validate(Some(item)))
                .and_then(|()| validate_nested(&element.ty, item))
                .map_err(|reason| format!("element {}: {}", index, reason))
        }),
        (TypeDescriptor::Map { key, value: val }, Value::Map(pairs)) => {
            pairs.iter().try_for_each(|(k, v)| {
                key.validators
                    .iter()
                    .try_for_each(|validator| validator.validate(Some(k)))
                    .and_then(|()| validate_nested(&key.ty, k))
                    .map_err(|reason| format!("map key {}: {}", k, reason))?;
                val.validators
                    .iter()
                    .try_for_each(|validator| validator.validate(Some(v)))
                    .and_then(|()| validate_nested(&val.ty, v))
                    .map_err(|reason| format!("map value for key {}: {}", k, reason))
            })
        }
        (_, Value::Struct(model)) => model.validate().map_err(|err| err.to_string()),
        _ => Ok(()),
    }
}
