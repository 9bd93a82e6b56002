// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte cursors shared by the reference protocols.
//!
//! The write side appends to a growable buffer and cannot fail. The read side
//! is bounds-checked and reports the offset of a short read.

use super::ProtocolError;

/// Generate big-endian read methods for primitive types.
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type, ProtocolError> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

/// Generate big-endian write methods for primitive types.
macro_rules! impl_write_be {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.buffer.extend_from_slice(&value.to_be_bytes());
        }
    };
}

/// Appending cursor over an output buffer.
pub(crate) struct WriteCursor<'a> {
    buffer: &'a mut Vec<u8>,
}

impl<'a> WriteCursor<'a> {
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self { buffer }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    impl_write_be!(write_i16_be, i16);
    impl_write_be!(write_i32_be, i32);
    impl_write_be!(write_i64_be, i64);

    pub fn write_f64_be(&mut self, value: f64) {
        self.write_i64_be(value.to_bits() as i64);
    }

    pub fn write_f64_le(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_bits().to_le_bytes());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Unsigned LEB128.
    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }
}

/// Bounds-checked cursor over an input slice.
pub(crate) struct ReadCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        let byte = *self
            .buffer
            .get(self.offset)
            .ok_or(ProtocolError::UnexpectedEof {
                offset: self.offset,
                needed: 1,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    impl_read_be!(read_i16_be, i16, 2);
    impl_read_be!(read_i32_be, i32, 4);
    impl_read_be!(read_i64_be, i64, 8);

    pub fn read_f64_be(&mut self) -> Result<f64, ProtocolError> {
        Ok(f64::from_bits(self.read_i64_be()? as u64))
    }

    pub fn read_f64_le(&mut self) -> Result<f64, ProtocolError> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.read_bytes(8)?);
        Ok(f64::from_bits(u64::from_le_bytes(bytes)))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ProtocolError> {
        if len > self.remaining() {
            return Err(ProtocolError::UnexpectedEof {
                offset: self.offset,
                needed: len,
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Unsigned LEB128, at most ten bytes.
    pub fn read_varint(&mut self) -> Result<u64, ProtocolError> {
        let start = self.offset;
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ProtocolError::VarintOverflow { offset: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_boundaries() {
        for value in [0u64, 1, 127, 128, 300, 16_383, 16_384, u64::from(u32::MAX), u64::MAX] {
            let mut buffer = Vec::new();
            WriteCursor::new(&mut buffer).write_varint(value);
            let mut cursor = ReadCursor::new(&buffer);
            assert_eq!(cursor.read_varint().expect("varint"), value);
            assert_eq!(cursor.remaining(), 0);
        }
    }

    #[test]
    fn test_varint_encoding_of_300() {
        let mut buffer = Vec::new();
        WriteCursor::new(&mut buffer).write_varint(300);
        assert_eq!(buffer, [0xac, 0x02]);
    }

    #[test]
    fn test_varint_overflow_is_reported() {
        let bytes = [0xffu8; 11];
        let err = ReadCursor::new(&bytes).read_varint().expect_err("too long");
        assert_eq!(err, ProtocolError::VarintOverflow { offset: 0 });
    }

    #[test]
    fn test_short_read_reports_offset() {
        let bytes = [0x00u8, 0x01, 0x02];
        let mut cursor = ReadCursor::new(&bytes);
        cursor.read_u8().expect("first byte");
        let err = cursor.read_i32_be().expect_err("short read");
        assert_eq!(
            err,
            ProtocolError::UnexpectedEof {
                offset: 1,
                needed: 4
            }
        );
    }

    #[test]
    fn test_doubles_keep_their_bits() {
        let mut buffer = Vec::new();
        {
            let mut writer = WriteCursor::new(&mut buffer);
            writer.write_f64_be(-1.5);
            writer.write_f64_le(std::f64::consts::PI);
        }
        assert_eq!(&buffer[..8], &(-1.5f64).to_be_bytes());
        let mut cursor = ReadCursor::new(&buffer);
        assert_eq!(cursor.read_f64_be().expect("be"), -1.5);
        assert_eq!(cursor.read_f64_le().expect("le"), std::f64::consts::PI);
    }
}
