// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thrift compact layout.
//!
//! Field headers pack the id delta from the previous field into the high
//! nibble when it fits in 1..=15, otherwise the type byte is followed by a
//! zigzag varint id. Boolean fields carry their value in the header type.
//! Integers are zigzag varints, doubles are 8 little-endian bytes, strings
//! are a varint length followed by the bytes.

use super::cursor::{ReadCursor, WriteCursor};
use super::{
    check_len, FieldHeader, ListHeader, MapHeader, Protocol, ProtocolError, ProtocolReader,
    ProtocolWriter, WireType,
};
use crate::codec::CodecConfig;

/// Factory for the compact layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactProtocol;

impl Protocol for CompactProtocol {
    fn name(&self) -> &'static str {
        "compact"
    }

    fn writer<'a>(&self, out: &'a mut Vec<u8>) -> Box<dyn ProtocolWriter + 'a> {
        Box::new(CompactWriter::new(out))
    }

    fn reader<'a>(&self, input: &'a [u8], config: &CodecConfig) -> Box<dyn ProtocolReader + 'a> {
        Box::new(CompactReader::new(input, config.clone()))
    }
}

// Compact type nibbles
const CT_BOOLEAN_TRUE: u8 = 0x01;
const CT_BOOLEAN_FALSE: u8 = 0x02;
const CT_BYTE: u8 = 0x03;
const CT_I16: u8 = 0x04;
const CT_I32: u8 = 0x05;
const CT_I64: u8 = 0x06;
const CT_DOUBLE: u8 = 0x07;
const CT_BINARY: u8 = 0x08;
const CT_LIST: u8 = 0x09;
const CT_SET: u8 = 0x0a;
const CT_MAP: u8 = 0x0b;
const CT_STRUCT: u8 = 0x0c;

fn compact_type(wire_type: WireType) -> u8 {
    match wire_type {
        WireType::Bool => CT_BOOLEAN_TRUE,
        WireType::Byte => CT_BYTE,
        WireType::I16 => CT_I16,
        WireType::I32 => CT_I32,
        WireType::I64 => CT_I64,
        WireType::Double => CT_DOUBLE,
        WireType::String | WireType::Utf8 => CT_BINARY,
        WireType::List => CT_LIST,
        WireType::Set => CT_SET,
        WireType::Map => CT_MAP,
        WireType::Struct => CT_STRUCT,
    }
}

fn wire_type(compact: u8) -> Result<WireType, ProtocolError> {
    Ok(match compact {
        CT_BOOLEAN_TRUE | CT_BOOLEAN_FALSE => WireType::Bool,
        CT_BYTE => WireType::Byte,
        CT_I16 => WireType::I16,
        CT_I32 => WireType::I32,
        CT_I64 => WireType::I64,
        CT_DOUBLE => WireType::Double,
        CT_BINARY => WireType::String,
        CT_LIST => WireType::List,
        CT_SET => WireType::Set,
        CT_MAP => WireType::Map,
        CT_STRUCT => WireType::Struct,
        other => return Err(ProtocolError::InvalidWireType(other)),
    })
}

fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

fn size_to_u64(size: usize) -> Result<u64, ProtocolError> {
    u64::try_from(size).map_err(|_| ProtocolError::Overflow("container size"))
}

pub struct CompactWriter<'a> {
    cursor: WriteCursor<'a>,
    last_field_id: i16,
    field_stack: Vec<i16>,
    pending_bool_field: Option<i16>,
}

impl<'a> CompactWriter<'a> {
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            cursor: WriteCursor::new(out),
            last_field_id: 0,
            field_stack: Vec::new(),
            pending_bool_field: None,
        }
    }

    fn write_field_header(&mut self, compact: u8, id: i16) {
        let delta = i32::from(id) - i32::from(self.last_field_id);
        if (1..=15).contains(&delta) {
            self.cursor.write_u8(((delta as u8) << 4) | compact);
        } else {
            self.cursor.write_u8(compact);
            self.cursor.write_varint(zigzag_encode(i64::from(id)));
        }
        self.last_field_id = id;
    }

    fn write_list_header(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError> {
        let compact = compact_type(element);
        if size < 15 {
            self.cursor.write_u8(((size as u8) << 4) | compact);
        } else {
            self.cursor.write_u8(0xf0 | compact);
            self.cursor.write_varint(size_to_u64(size)?);
        }
        Ok(())
    }
}

impl ProtocolWriter for CompactWriter<'_> {
    fn begin_struct(&mut self, _name: &str) -> Result<(), ProtocolError> {
        self.field_stack.push(self.last_field_id);
        self.last_field_id = 0;
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), ProtocolError> {
        self.last_field_id = self
            .field_stack
            .pop()
            .ok_or(ProtocolError::InvalidState("end_struct without begin_struct"))?;
        Ok(())
    }

    fn begin_field(
        &mut self,
        _name: &str,
        wire_type: WireType,
        id: i16,
    ) -> Result<(), ProtocolError> {
        if wire_type == WireType::Bool {
            self.pending_bool_field = Some(id);
        } else {
            self.write_field_header(compact_type(wire_type), id);
        }
        Ok(())
    }

    fn end_field(&mut self) -> Result<(), ProtocolError> {
        if self.pending_bool_field.is_some() {
            return Err(ProtocolError::InvalidState("bool field without a value"));
        }
        Ok(())
    }

    fn write_field_stop(&mut self) -> Result<(), ProtocolError> {
        self.cursor.write_u8(0);
        Ok(())
    }

    fn begin_list(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError> {
        self.write_list_header(element, size)
    }

    fn end_list(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_set(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError> {
        self.write_list_header(element, size)
    }

    fn end_set(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_map(
        &mut self,
        key: WireType,
        value: WireType,
        size: usize,
    ) -> Result<(), ProtocolError> {
        if size == 0 {
            self.cursor.write_u8(0);
        } else {
            self.cursor.write_varint(size_to_u64(size)?);
            self.cursor
                .write_u8((compact_type(key) << 4) | compact_type(value));
        }
        Ok(())
    }

    fn end_map(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError> {
        let compact = if value { CT_BOOLEAN_TRUE } else { CT_BOOLEAN_FALSE };
        match self.pending_bool_field.take() {
            Some(id) => self.write_field_header(compact, id),
            None => self.cursor.write_u8(compact),
        }
        Ok(())
    }

    fn write_byte(&mut self, value: i8) -> Result<(), ProtocolError> {
        self.cursor.write_u8(value as u8);
        Ok(())
    }

    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError> {
        self.cursor.write_varint(zigzag_encode(i64::from(value)));
        Ok(())
    }

    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError> {
        self.cursor.write_varint(zigzag_encode(i64::from(value)));
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError> {
        self.cursor.write_varint(zigzag_encode(value));
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError> {
        self.cursor.write_f64_le(value);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError> {
        self.cursor.write_varint(size_to_u64(value.len())?);
        self.cursor.write_bytes(value);
        Ok(())
    }
}

pub struct CompactReader<'a> {
    cursor: ReadCursor<'a>,
    config: CodecConfig,
    last_field_id: i16,
    field_stack: Vec<i16>,
    pending_bool_value: Option<bool>,
}

impl<'a> CompactReader<'a> {
    pub fn new(input: &'a [u8], config: CodecConfig) -> Self {
        Self {
            cursor: ReadCursor::new(input),
            config,
            last_field_id: 0,
            field_stack: Vec::new(),
            pending_bool_value: None,
        }
    }

    fn read_zigzag(&mut self) -> Result<i64, ProtocolError> {
        Ok(zigzag_decode(self.cursor.read_varint()?))
    }

    fn read_len(&mut self, max: usize) -> Result<usize, ProtocolError> {
        let offset = self.cursor.offset();
        let len = usize::try_from(self.cursor.read_varint()?)
            .map_err(|_| ProtocolError::VarintOverflow { offset })?;
        check_len(len, max)
    }

    fn read_size(&mut self) -> Result<usize, ProtocolError> {
        let size = self.read_len(self.config.max_container_len)?;
        self.check_remaining(size)
    }

    /// Every element takes at least one byte.
    fn check_remaining(&self, size: usize) -> Result<usize, ProtocolError> {
        if size > self.cursor.remaining() {
            return Err(ProtocolError::UnexpectedEof {
                offset: self.cursor.offset(),
                needed: size,
            });
        }
        Ok(size)
    }

    fn read_list_header(&mut self) -> Result<ListHeader, ProtocolError> {
        let byte = self.cursor.read_u8()?;
        let element = wire_type(byte & 0x0f)?;
        let size = match byte >> 4 {
            15 => self.read_size()?,
            short => {
                let size = check_len(usize::from(short), self.config.max_container_len)?;
                self.check_remaining(size)?
            }
        };
        Ok(ListHeader { element, size })
    }

    fn narrow<T: TryFrom<i64>>(&self, value: i64, what: &'static str) -> Result<T, ProtocolError> {
        T::try_from(value).map_err(|_| ProtocolError::Overflow(what))
    }
}

impl ProtocolReader for CompactReader<'_> {
    fn begin_struct(&mut self) -> Result<(), ProtocolError> {
        self.field_stack.push(self.last_field_id);
        self.last_field_id = 0;
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), ProtocolError> {
        self.last_field_id = self
            .field_stack
            .pop()
            .ok_or(ProtocolError::InvalidState("end_struct without begin_struct"))?;
        Ok(())
    }

    fn begin_field(&mut self) -> Result<Option<FieldHeader>, ProtocolError> {
        let byte = self.cursor.read_u8()?;
        if byte == 0 {
            return Ok(None);
        }
        let compact = byte & 0x0f;
        let delta = byte >> 4;
        let id = if delta == 0 {
            let raw = self.read_zigzag()?;
            self.narrow::<i16>(raw, "field id")?
        } else {
            self.last_field_id
                .checked_add(i16::from(delta))
                .ok_or(ProtocolError::Overflow("field id"))?
        };
        let wire_type = wire_type(compact)?;
        if wire_type == WireType::Bool {
            self.pending_bool_value = Some(compact == CT_BOOLEAN_TRUE);
        }
        self.last_field_id = id;
        Ok(Some(FieldHeader { wire_type, id }))
    }

    fn end_field(&mut self) -> Result<(), ProtocolError> {
        self.pending_bool_value = None;
        Ok(())
    }

    fn begin_list(&mut self) -> Result<ListHeader, ProtocolError> {
        self.read_list_header()
    }

    fn end_list(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_set(&mut self) -> Result<ListHeader, ProtocolError> {
        self.read_list_header()
    }

    fn end_set(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_map(&mut self) -> Result<MapHeader, ProtocolError> {
        let size = self.read_size()?;
        if size == 0 {
            return Ok(MapHeader {
                key: WireType::Byte,
                value: WireType::Byte,
                size,
            });
        }
        let types = self.cursor.read_u8()?;
        Ok(MapHeader {
            key: wire_type(types >> 4)?,
            value: wire_type(types & 0x0f)?,
            size,
        })
    }

    fn end_map(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        if let Some(value) = self.pending_bool_value.take() {
            return Ok(value);
        }
        match self.cursor.read_u8()? {
            CT_BOOLEAN_TRUE => Ok(true),
            CT_BOOLEAN_FALSE | 0 => Ok(false),
            other => Err(ProtocolError::InvalidWireType(other)),
        }
    }

    fn read_byte(&mut self) -> Result<i8, ProtocolError> {
        Ok(self.cursor.read_u8()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        let raw = self.read_zigzag()?;
        self.narrow(raw, "i16")
    }

    fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        let raw = self.read_zigzag()?;
        self.narrow(raw, "i32")
    }

    fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        self.read_zigzag()
    }

    fn read_double(&mut self) -> Result<f64, ProtocolError> {
        self.cursor.read_f64_le()
    }

    fn read_string(&mut self) -> Result<String, ProtocolError> {
        let offset = self.cursor.offset();
        String::from_utf8(self.read_binary()?).map_err(|_| ProtocolError::InvalidUtf8 { offset })
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let len = self.read_len(self.config.max_string_len)?;
        Ok(self.cursor.read_bytes(len)?.to_vec())
    }

    fn max_depth(&self) -> usize {
        self.config.max_depth
    }
}
