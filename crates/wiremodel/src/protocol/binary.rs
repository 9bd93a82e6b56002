// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thrift binary layout.
//!
//! ```text
//! field:  [type u8][id i16]  value        stop: [0x00]
//! list:   [elem u8][size i32] elements    set: same as list
//! map:    [key u8][value u8][size i32] key/value pairs
//! string: [len i32][bytes]               bool: [0x00 | 0x01]
//! ```
//!
//! Integers and doubles are big-endian. UTF-8 strings travel as strings.

use super::cursor::{ReadCursor, WriteCursor};
use super::{
    check_len, FieldHeader, ListHeader, MapHeader, Protocol, ProtocolError, ProtocolReader,
    ProtocolWriter, WireType,
};
use crate::codec::CodecConfig;

/// Factory for the binary layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryProtocol;

impl Protocol for BinaryProtocol {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn writer<'a>(&self, out: &'a mut Vec<u8>) -> Box<dyn ProtocolWriter + 'a> {
        Box::new(BinaryWriter::new(out))
    }

    fn reader<'a>(&self, input: &'a [u8], config: &CodecConfig) -> Box<dyn ProtocolReader + 'a> {
        Box::new(BinaryReader::new(input, config.clone()))
    }
}

fn on_wire(wire_type: WireType) -> u8 {
    match wire_type {
        WireType::Utf8 => WireType::String.id(),
        other => other.id(),
    }
}

fn size_to_i32(size: usize) -> Result<i32, ProtocolError> {
    i32::try_from(size).map_err(|_| ProtocolError::Overflow("container size"))
}

pub struct BinaryWriter<'a> {
    cursor: WriteCursor<'a>,
}

impl<'a> BinaryWriter<'a> {
    pub fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            cursor: WriteCursor::new(out),
        }
    }

    fn write_header(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError> {
        self.cursor.write_u8(on_wire(element));
        self.cursor.write_i32_be(size_to_i32(size)?);
        Ok(())
    }
}

impl ProtocolWriter for BinaryWriter<'_> {
    fn begin_struct(&mut self, _name: &str) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_field(
        &mut self,
        _name: &str,
        wire_type: WireType,
        id: i16,
    ) -> Result<(), ProtocolError> {
        self.cursor.write_u8(on_wire(wire_type));
        self.cursor.write_i16_be(id);
        Ok(())
    }

    fn end_field(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_field_stop(&mut self) -> Result<(), ProtocolError> {
        self.cursor.write_u8(0);
        Ok(())
    }

    fn begin_list(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError> {
        self.write_header(element, size)
    }

    fn end_list(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_set(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError> {
        self.write_header(element, size)
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
        self.cursor.write_u8(on_wire(key));
        self.write_header(value, size)
    }

    fn end_map(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError> {
        self.cursor.write_u8(u8::from(value));
        Ok(())
    }

    fn write_byte(&mut self, value: i8) -> Result<(), ProtocolError> {
        self.cursor.write_u8(value as u8);
        Ok(())
    }

    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError> {
        self.cursor.write_i16_be(value);
        Ok(())
    }

    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError> {
        self.cursor.write_i32_be(value);
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError> {
        self.cursor.write_i64_be(value);
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError> {
        self.cursor.write_f64_be(value);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError> {
        let len = i32::try_from(value.len()).map_err(|_| ProtocolError::Overflow("string length"))?;
        self.cursor.write_i32_be(len);
        self.cursor.write_bytes(value);
        Ok(())
    }
}

pub struct BinaryReader<'a> {
    cursor: ReadCursor<'a>,
    config: CodecConfig,
}

impl<'a> BinaryReader<'a> {
    pub fn new(input: &'a [u8], config: CodecConfig) -> Self {
        Self {
            cursor: ReadCursor::new(input),
            config,
        }
    }

    fn read_len(&mut self) -> Result<usize, ProtocolError> {
        let len = self.cursor.read_i32_be()?;
        usize::try_from(len).map_err(|_| ProtocolError::NegativeLength(i64::from(len)))
    }

    fn read_size(&mut self) -> Result<usize, ProtocolError> {
        let size = check_len(self.read_len()?, self.config.max_container_len)?;
        // Every element takes at least one byte.
        if size > self.cursor.remaining() {
            return Err(ProtocolError::UnexpectedEof {
                offset: self.cursor.offset(),
                needed: size,
            });
        }
        Ok(size)
    }

    fn read_list_header(&mut self) -> Result<ListHeader, ProtocolError> {
        let element = WireType::from_id(self.cursor.read_u8()?)?;
        let size = self.read_size()?;
        Ok(ListHeader { element, size })
    }
}

impl ProtocolReader for BinaryReader<'_> {
    fn begin_struct(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn end_struct(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn begin_field(&mut self) -> Result<Option<FieldHeader>, ProtocolError> {
        let type_id = self.cursor.read_u8()?;
        if type_id == 0 {
            return Ok(None);
        }
        let wire_type = WireType::from_id(type_id)?;
        let id = self.cursor.read_i16_be()?;
        Ok(Some(FieldHeader { wire_type, id }))
    }

    fn end_field(&mut self) -> Result<(), ProtocolError> {
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
        let key = WireType::from_id(self.cursor.read_u8()?)?;
        let value = WireType::from_id(self.cursor.read_u8()?)?;
        let size = self.read_size()?;
        Ok(MapHeader { key, value, size })
    }

    fn end_map(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.cursor.read_u8()? != 0)
    }

    fn read_byte(&mut self) -> Result<i8, ProtocolError> {
        Ok(self.cursor.read_u8()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        self.cursor.read_i16_be()
    }

    fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        self.cursor.read_i32_be()
    }

    fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        self.cursor.read_i64_be()
    }

    fn read_double(&mut self) -> Result<f64, ProtocolError> {
        self.cursor.read_f64_be()
    }

    fn read_string(&mut self) -> Result<String, ProtocolError> {
        let offset = self.cursor.offset();
        String::from_utf8(self.read_binary()?).map_err(|_| ProtocolError::InvalidUtf8 { offset })
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let len = check_len(self.read_len()?, self.config.max_string_len)?;
        Ok(self.cursor.read_bytes(len)?.to_vec())
    }

    fn max_depth(&self) -> usize {
        self.config.max_depth
    }
}
