// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model to protocol writer.

use super::CodecError;
use crate::model::Model;
use crate::protocol::ProtocolWriter;
use crate::types::{TypeDescriptor, Value};

pub(crate) struct Encoder<'w, 'a> {
    writer: &'w mut (dyn ProtocolWriter + 'a),
    max_depth: usize,
}

impl<'w, 'a> Encoder<'w, 'a> {
    pub(crate) fn new(writer: &'w mut (dyn ProtocolWriter + 'a), max_depth: usize) -> Self {
        Self { writer, max_depth }
    }

    /// Write the set fields of `model` in ascending id order, then the stop
    /// marker. `depth` counts the struct itself.
    pub(crate) fn write_struct(&mut self, model: &Model, depth: usize) -> Result<(), CodecError> {
        self.check_depth(depth)?;
        self.writer.begin_struct(model.type_name())?;
        for (field, value) in model.iter() {
            self.writer
                .begin_field(&field.name, field.ty.wire_type(), field.id)?;
            self.write_value(&field.ty, value, depth)
                .map_err(|err| err.in_field(model.type_name(), &field.attr_name))?;
            self.writer.end_field()?;
        }
        self.writer.write_field_stop()?;
        self.writer.end_struct()?;
        Ok(())
    }

    fn write_value(
        &mut self,
        ty: &TypeDescriptor,
        value: &Value,
        depth: usize,
    ) -> Result<(), CodecError> {
        match (ty, value) {
            (TypeDescriptor::I64, Value::I64(v)) => self.writer.write_i64(*v)?,
            (TypeDescriptor::Double, Value::Double(v)) => self.writer.write_double(*v)?,
            (TypeDescriptor::Bool, Value::Bool(v)) => self.writer.write_bool(*v)?,
            (TypeDescriptor::String { binary: false } | TypeDescriptor::Utf8, Value::String(s)) => {
                self.writer.write_string(s)?
            }
            (TypeDescriptor::String { binary: true }, Value::Binary(bytes)) => {
                self.writer.write_binary(bytes)?
            }
            (TypeDescriptor::List(element), Value::List(items)) => {
                self.check_depth(depth + 1)?;
                self.writer.begin_list(element.ty.wire_type(), items.len())?;
                for item in items {
                    self.write_value(&element.ty, item, depth + 1)?;
                }
                self.writer.end_list()?;
            }
            (TypeDescriptor::Set(element), Value::Set(items)) => {
                self.check_depth(depth + 1)?;
                self.writer.begin_set(element.ty.wire_type(), items.len())?;
                for item in items {
                    self.write_value(&element.ty, item, depth + 1)?;
                }
                self.writer.end_set()?;
            }
            (TypeDescriptor::Map { key, value: val }, Value::Map(pairs)) => {
                self.check_depth(depth + 1)?;
                self.writer
                    .begin_map(key.ty.wire_type(), val.ty.wire_type(), pairs.len())?;
                for (k, v) in pairs {
                    self.write_value(&key.ty, k, depth + 1)?;
                    self.write_value(&val.ty, v, depth + 1)?;
                }
                self.writer.end_map()?;
            }
            (
                TypeDescriptor::Struct(target) | TypeDescriptor::Union { target, .. },
                Value::Struct(model),
            ) if model.type_name() == target.name() => self.write_struct(model, depth + 1)?,
            _ => {
                return Err(CodecError::TypeMismatch {
                    type_name: String::new(),
                    field: String::new(),
                    expected: ty.type_name(),
                    found: match value {
                        Value::Struct(model) => model.type_name().to_string(),
                        other => other.kind_name().to_string(),
                    },
                })
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), CodecError> {
        if depth > self.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                max: self.max_depth,
            });
        }
        Ok(())
    }
}
