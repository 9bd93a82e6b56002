// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model instances: sparse field storage over a frozen schema.
//!
//! A [`Model`] holds values only for the fields that were set. Unset is
//! distinct from a field's default: defaults are reported by
//! [`Model::get_or_default`] but never stored, compared or serialized.

mod instance;
mod validate;

#[cfg(test)]
mod tests;

pub use instance::Model;

use crate::field::FieldId;
use std::fmt;

/// Instance-level failures. Each variant names the type and the field.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No field with this attribute (or wire) name.
    UndefinedField { type_name: String, field: String },
    /// No field with this id.
    UndefinedFieldId { type_name: String, id: FieldId },
    /// A typed getter found a value of another type.
    WrongType {
        type_name: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// More positional values than the type has fields.
    TooManyArguments {
        type_name: String,
        expected: usize,
        given: usize,
    },
    /// A field failed validation.
    Validation {
        type_name: String,
        field: String,
        id: FieldId,
        reason: String,
    },
    /// A whole-instance check failed (union exclusivity or a model validator).
    ModelValidation {
        type_name: String,
        validator: String,
        reason: String,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedField { type_name, field } => {
                write!(f, "{} has no field named {}", type_name, field)
            }
            Self::UndefinedFieldId { type_name, id } => {
                write!(f, "{} has no field with id {}", type_name, id)
            }
            Self::WrongType {
                type_name,
                field,
                expected,
                found,
            } => write!(
                f,
                "{}.{} holds {}, requested {}",
                type_name, field, found, expected
            ),
            Self::TooManyArguments {
                type_name,
                expected,
                given,
            } => write!(
                f,
                "{} takes at most {} positional values, {} given",
                type_name, expected, given
            ),
            Self::Validation {
                type_name,
                field,
                id,
                reason,
            } => write!(
                f,
                "validation failed for {}.{} (id {}): {}",
                type_name, field, id, reason
            ),
            Self::ModelValidation {
                type_name,
                validator,
                reason,
            } => write!(
                f,
                "validation failed for {} ({}): {}",
                type_name, validator, reason
            ),
        }
    }
}

impl std::error::Error for ModelError {}
