// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol boundary and reference protocol implementations.
//!
//! The codec only talks to [`ProtocolWriter`] and [`ProtocolReader`]; the
//! bit-level layout belongs to the protocol. Two layouts ship with the crate:
//!
//! - [`BinaryProtocol`] - fixed-width big-endian fields (Thrift binary)
//! - [`CompactProtocol`] - zigzag varints and field-id deltas (Thrift compact)

mod binary;
mod compact;
mod cursor;

pub use binary::BinaryProtocol;
pub use compact::CompactProtocol;

use crate::codec::CodecConfig;
use std::fmt;

/// Wire type tag (Thrift TType numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
    Utf8 = 16,
}

impl WireType {
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Result<Self, ProtocolError> {
        Ok(match id {
            2 => Self::Bool,
            3 => Self::Byte,
            4 => Self::Double,
            6 => Self::I16,
            8 => Self::I32,
            10 => Self::I64,
            11 => Self::String,
            12 => Self::Struct,
            13 => Self::Map,
            14 => Self::Set,
            15 => Self::List,
            16 => Self::Utf8,
            other => return Err(ProtocolError::InvalidWireType(other)),
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Double => "double",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::String => "string",
            Self::Struct => "struct",
            Self::Map => "map",
            Self::Set => "set",
            Self::List => "list",
            Self::Utf8 => "utf8",
        }
    }

    /// Check if a value written as `self` can be read as `declared`.
    ///
    /// Strings and UTF-8 strings share one encoding.
    pub fn is_compatible_with(self, declared: WireType) -> bool {
        self == declared || (self.is_string() && declared.is_string())
    }

    fn is_string(self) -> bool {
        matches!(self, Self::String | Self::Utf8)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field header read from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub wire_type: WireType,
    pub id: i16,
}

/// List or set header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub element: WireType,
    pub size: usize,
}

/// Map header. Key and value types are meaningless when `size` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub key: WireType,
    pub value: WireType,
    pub size: usize,
}

/// Protocol encoding/decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    UnexpectedEof { offset: usize, needed: usize },
    InvalidWireType(u8),
    NegativeLength(i64),
    /// A container or string length exceeds the configured limit.
    LengthLimit { len: usize, max: usize },
    InvalidUtf8 { offset: usize },
    VarintOverflow { offset: usize },
    /// Nesting of skipped values exceeds the configured depth.
    DepthLimitExceeded { max: usize },
    /// Value too large for the wire representation.
    Overflow(&'static str),
    /// Writer or reader used out of order.
    InvalidState(&'static str),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { offset, needed } => write!(
                f,
                "unexpected end of input at offset {} ({} more bytes needed)",
                offset, needed
            ),
            Self::InvalidWireType(id) => write!(f, "invalid wire type {}", id),
            Self::NegativeLength(len) => write!(f, "negative length {}", len),
            Self::LengthLimit { len, max } => {
                write!(f, "length {} exceeds limit {}", len, max)
            }
            Self::InvalidUtf8 { offset } => write!(f, "invalid UTF-8 string at offset {}", offset),
            Self::VarintOverflow { offset } => write!(f, "varint too long at offset {}", offset),
            Self::DepthLimitExceeded { max } => write!(f, "nesting deeper than {}", max),
            Self::Overflow(what) => write!(f, "{} does not fit the wire encoding", what),
            Self::InvalidState(msg) => write!(f, "invalid protocol state: {}", msg),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encoding half of a protocol.
pub trait ProtocolWriter {
    fn begin_struct(&mut self, name: &str) -> Result<(), ProtocolError>;
    fn end_struct(&mut self) -> Result<(), ProtocolError>;
    fn begin_field(
        &mut self,
        name: &str,
        wire_type: WireType,
        id: i16,
    ) -> Result<(), ProtocolError>;
    fn end_field(&mut self) -> Result<(), ProtocolError>;
    fn write_field_stop(&mut self) -> Result<(), ProtocolError>;

    fn begin_list(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError>;
    fn end_list(&mut self) -> Result<(), ProtocolError>;
    fn begin_set(&mut self, element: WireType, size: usize) -> Result<(), ProtocolError>;
    fn end_set(&mut self) -> Result<(), ProtocolError>;
    fn begin_map(
        &mut self,
        key: WireType,
        value: WireType,
        size: usize,
    ) -> Result<(), ProtocolError>;
    fn end_map(&mut self) -> Result<(), ProtocolError>;

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError>;
    fn write_byte(&mut self, value: i8) -> Result<(), ProtocolError>;
    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError>;
    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError>;
    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError>;
    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError>;
    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError>;
    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError>;
}

/// Decoding half of a protocol.
pub trait ProtocolReader {
    fn begin_struct(&mut self) -> Result<(), ProtocolError>;
    fn end_struct(&mut self) -> Result<(), ProtocolError>;
    /// Next field header, or `None` at the stop marker.
    fn begin_field(&mut self) -> Result<Option<FieldHeader>, ProtocolError>;
    fn end_field(&mut self) -> Result<(), ProtocolError>;

    fn begin_list(&mut self) -> Result<ListHeader, ProtocolError>;
    fn end_list(&mut self) -> Result<(), ProtocolError>;
    fn begin_set(&mut self) -> Result<ListHeader, ProtocolError>;
    fn end_set(&mut self) -> Result<(), ProtocolError>;
    fn begin_map(&mut self) -> Result<MapHeader, ProtocolError>;
    fn end_map(&mut self) -> Result<(), ProtocolError>;

    fn read_bool(&mut self) -> Result<bool, ProtocolError>;
    fn read_byte(&mut self) -> Result<i8, ProtocolError>;
    fn read_i16(&mut self) -> Result<i16, ProtocolError>;
    fn read_i32(&mut self) -> Result<i32, ProtocolError>;
    fn read_i64(&mut self) -> Result<i64, ProtocolError>;
    fn read_double(&mut self) -> Result<f64, ProtocolError>;
    fn read_string(&mut self) -> Result<String, ProtocolError>;
    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError>;

    /// Nesting limit applied by [`ProtocolReader::skip`].
    fn max_depth(&self) -> usize {
        CodecConfig::DEFAULT_MAX_DEPTH
    }

    /// Consume one value of `wire_type` without decoding it.
    fn skip(&mut self, wire_type: WireType) -> Result<(), ProtocolError> {
        let depth = self.max_depth();
        self.skip_within(wire_type, depth)
    }

    /// [`ProtocolReader::skip`] with only `remaining` nesting levels left,
    /// for values found below the top level.
    fn skip_within(&mut self, wire_type: WireType, remaining: usize) -> Result<(), ProtocolError> {
        skip_value(self, wire_type, remaining)
    }
}

fn skip_value<R>(reader: &mut R, wire_type: WireType, depth: usize) -> Result<(), ProtocolError>
where
    R: ProtocolReader + ?Sized,
{
    match wire_type {
        WireType::Bool => reader.read_bool().map(drop),
        WireType::Byte => reader.read_byte().map(drop),
        WireType::Double => reader.read_double().map(drop),
        WireType::I16 => reader.read_i16().map(drop),
        WireType::I32 => reader.read_i32().map(drop),
        WireType::I64 => reader.read_i64().map(drop),
        WireType::String | WireType::Utf8 => reader.read_binary().map(drop),
        WireType::Struct => {
            let depth = descend(reader, depth)?;
            reader.begin_struct()?;
            while let Some(header) = reader.begin_field()? {
                skip_value(reader, header.wire_type, depth)?;
                reader.end_field()?;
            }
            reader.end_struct()
        }
        WireType::List => {
            let depth = descend(reader, depth)?;
            let header = reader.begin_list()?;
            for _ in 0..header.size {
                skip_value(reader, header.element, depth)?;
            }
            reader.end_list()
        }
        WireType::Set => {
            let depth = descend(reader, depth)?;
            let header = reader.begin_set()?;
            for _ in 0..header.size {
                skip_value(reader, header.element, depth)?;
            }
            reader.end_set()
        }
        WireType::Map => {
            let depth = descend(reader, depth)?;
            let header = reader.begin_map()?;
            for _ in 0..header.size {
                skip_value(reader, header.key, depth)?;
                skip_value(reader, header.value, depth)?;
            }
            reader.end_map()
        }
    }
}

fn descend<R>(reader: &R, depth: usize) -> Result<usize, ProtocolError>
where
    R: ProtocolReader + ?Sized,
{
    depth.checked_sub(1).ok_or(ProtocolError::DepthLimitExceeded {
        max: reader.max_depth(),
    })
}

/// Factory of writers and readers for one wire layout.
pub trait Protocol {
    /// Short layout name, for logs.
    fn name(&self) -> &'static str;

    /// Writer appending to `out`.
    fn writer<'a>(&self, out: &'a mut Vec<u8>) -> Box<dyn ProtocolWriter + 'a>;

    /// Reader over `input`, enforcing the length limits of `config`.
    fn reader<'a>(&self, input: &'a [u8], config: &CodecConfig) -> Box<dyn ProtocolReader + 'a>;
}

/// Reject lengths over `max`.
pub(crate) fn check_len(len: usize, max: usize) -> Result<usize, ProtocolError> {
    if len > max {
        Err(ProtocolError::LengthLimit { len, max })
    } else {
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_ids_round_trip() {
        for id in 0u8..=20 {
            match WireType::from_id(id) {
                Ok(wire_type) => assert_eq!(wire_type.id(), id),
                Err(err) => assert_eq!(err, ProtocolError::InvalidWireType(id)),
            }
        }
        assert_eq!(WireType::from_id(16), Ok(WireType::Utf8));
        assert!(WireType::from_id(0).is_err());
    }

    #[test]
    fn test_string_compatibility() {
        assert!(WireType::String.is_compatible_with(WireType::Utf8));
        assert!(WireType::Utf8.is_compatible_with(WireType::String));
        assert!(!WireType::I32.is_compatible_with(WireType::I64));
    }
}
