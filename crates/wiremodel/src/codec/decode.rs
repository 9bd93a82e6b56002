// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol reader to model.

use super::CodecError;
use crate::model::Model;
use crate::protocol::{ProtocolReader, WireType};
use crate::schema::{Registry, StructSchema};
use crate::types::{TypeDescriptor, Value};
use std::sync::Arc;

pub(crate) struct Decoder<'d, 'a> {
    registry: &'d Registry,
    reader: &'d mut (dyn ProtocolReader + 'a),
    max_depth: usize,
}

impl<'d, 'a> Decoder<'d, 'a> {
    pub(crate) fn new(
        registry: &'d Registry,
        reader: &'d mut (dyn ProtocolReader + 'a),
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            reader,
            max_depth,
        }
    }

    /// Read one struct into a fresh instance of `schema`.
    ///
    /// Unknown field ids and fields whose wire type disagrees with the local
    /// declaration are skipped.
    pub(crate) fn read_struct(
        &mut self,
        schema: &Arc<StructSchema>,
        depth: usize,
    ) -> Result<Model, CodecError> {
        self.check_depth(depth)?;
        let mut model = Model::new(schema);
        self.reader.begin_struct()?;

        while let Some(header) = self.reader.begin_field()? {
            match schema.field_by_id(header.id) {
                Some(field) if header.wire_type.is_compatible_with(field.ty.wire_type()) => {
                    let value = self
                        .read_value(&field.ty, depth)
                        .map_err(|err| err.in_field(schema.name(), &field.attr_name))?;
                    model.insert_by_id(field.id, value);
                }
                Some(field) => {
                    log::debug!(
                        "[codec] {}.{}: wire type {} does not match declared {}, skipped",
                        schema.name(),
                        field.attr_name,
                        header.wire_type,
                        field.ty.type_name()
                    );
                    self.skip(header.wire_type, depth)?;
                }
                None => {
                    log::debug!(
                        "[codec] {}: unknown field id {} ({}) skipped",
                        schema.name(),
                        header.id,
                        header.wire_type
                    );
                    self.skip(header.wire_type, depth)?;
                }
            }
            self.reader.end_field()?;
        }

        self.reader.end_struct()?;
        Ok(model)
    }

    fn read_value(&mut self, ty: &TypeDescriptor, depth: usize) -> Result<Value, CodecError> {
        let value = match ty {
            TypeDescriptor::I64 => Value::I64(self.reader.read_i64()?),
            TypeDescriptor::Double => Value::Double(self.reader.read_double()?),
            TypeDescriptor::Bool => Value::Bool(self.reader.read_bool()?),
            TypeDescriptor::String { binary: false } | TypeDescriptor::Utf8 => {
                Value::String(self.reader.read_string()?)
            }
            TypeDescriptor::String { binary: true } => Value::Binary(self.reader.read_binary()?),
            TypeDescriptor::List(element) => {
                self.check_depth(depth + 1)?;
                let header = self.reader.begin_list()?;
                let items =
                    self.read_elements(&element.ty, header.element, header.size, depth + 1)?;
                self.reader.end_list()?;
                Value::List(items)
            }
            TypeDescriptor::Set(element) => {
                self.check_depth(depth + 1)?;
                let header = self.reader.begin_set()?;
                let items =
                    self.read_elements(&element.ty, header.element, header.size, depth + 1)?;
                self.reader.end_set()?;
                Value::Set(items)
            }
            TypeDescriptor::Map { key, value } => {
                self.check_depth(depth + 1)?;
                let header = self.reader.begin_map()?;
                if header.size > 0 {
                    expect_wire_type(&key.ty, header.key)?;
                    expect_wire_type(&value.ty, header.value)?;
                }
                let mut pairs = Vec::with_capacity(header.size);
                for _ in 0..header.size {
                    let k = self.read_value(&key.ty, depth + 1)?;
                    let v = self.read_value(&value.ty, depth + 1)?;
                    pairs.push((k, v));
                }
                self.reader.end_map()?;
                Value::Map(pairs)
            }
            TypeDescriptor::Struct(target) | TypeDescriptor::Union { target, .. } => {
                let schema = self.registry.schema(target.name())?;
                Value::Struct(Box::new(self.read_struct(&schema, depth + 1)?))
            }
        };
        Ok(value)
    }

    fn read_elements(
        &mut self,
        ty: &TypeDescriptor,
        wire_type: WireType,
        size: usize,
        depth: usize,
    ) -> Result<Vec<Value>, CodecError> {
        if size > 0 {
            expect_wire_type(ty, wire_type)?;
        }
        let mut items = Vec::with_capacity(size);
        for _ in 0..size {
            items.push(self.read_value(ty, depth)?);
        }
        Ok(items)
    }

    /// Skip a field value of the struct at `depth`.
    fn skip(&mut self, wire_type: WireType, depth: usize) -> Result<(), CodecError> {
        let remaining = self.max_depth.saturating_sub(depth);
        self.reader.skip_within(wire_type, remaining)?;
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

/// Container elements cannot be skipped one by one, so a mismatch fails.
fn expect_wire_type(ty: &TypeDescriptor, found: WireType) -> Result<(), CodecError> {
    let expected = ty.wire_type();
    if found.is_compatible_with(expected) {
        Ok(())
    } else {
        Err(CodecError::ElementTypeMismatch { expected, found })
    }
}
