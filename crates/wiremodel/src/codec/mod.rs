// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serialize/deserialize drivers.
//!
//! The drivers walk a frozen [`StructSchema`] and hand each present field to
//! a [`ProtocolWriter`], or read fields from a [`ProtocolReader`] into an
//! empty [`Model`]. They know nothing about the byte layout.

mod config;
mod decode;
mod encode;

pub use config::{CodecConfig, ConfigError};

use crate::model::Model;
use crate::protocol::{Protocol, ProtocolError, ProtocolReader, ProtocolWriter, WireType};
use crate::schema::{Registry, SchemaError, StructSchema};
use decode::Decoder;
use encode::Encoder;
use std::fmt;
use std::sync::Arc;

/// Encoding and decoding failures.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// A stored value disagrees with its declared type.
    TypeMismatch {
        type_name: String,
        field: String,
        expected: String,
        found: String,
    },
    /// Container elements on the wire have another type than declared.
    ElementTypeMismatch { expected: WireType, found: WireType },
    /// Structs and containers nest deeper than the configured limit.
    DepthLimitExceeded { max: usize },
    Protocol(ProtocolError),
    Schema(SchemaError),
}

impl CodecError {
    /// Attach the innermost field a type mismatch was found in.
    pub(crate) fn in_field(self, type_name: &str, field: &str) -> Self {
        match self {
            Self::TypeMismatch {
                type_name: ref t,
                field: ref f,
                expected,
                found,
            } if t.is_empty() && f.is_empty() => Self::TypeMismatch {
                type_name: type_name.to_string(),
                field: field.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                type_name,
                field,
                expected,
                found,
            } => write!(
                f,
                "{}.{} declared as {} holds {}",
                type_name, field, expected, found
            ),
            Self::ElementTypeMismatch { expected, found } => write!(
                f,
                "container elements are {} on the wire, declared {}",
                found, expected
            ),
            Self::DepthLimitExceeded { max } => write!(f, "nesting deeper than {}", max),
            Self::Protocol(e) => write!(f, "protocol error: {}", e),
            Self::Schema(e) => write!(f, "schema error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(e) => Some(e),
            Self::Schema(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProtocolError> for CodecError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

impl From<SchemaError> for CodecError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

/// Codec bound to a registry and decode limits.
#[derive(Debug)]
pub struct Codec<'r> {
    registry: &'r Registry,
    config: CodecConfig,
}

impl<'r> Codec<'r> {
    /// Codec with default limits.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: CodecConfig::default(),
        }
    }

    /// Codec with custom limits. Zero limits are rejected.
    pub fn with_config(registry: &'r Registry, config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `model` with `protocol`.
    pub fn serialize(&self, model: &Model, protocol: &dyn Protocol) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        {
            let mut writer = protocol.writer(&mut out);
            Encoder::new(writer.as_mut(), self.config.max_depth).write_struct(model, 1)?;
        }
        log::trace!(
            "[codec] serialized {} ({} fields, {} bytes, {})",
            model.type_name(),
            model.len(),
            out.len(),
            protocol.name()
        );
        Ok(out)
    }

    /// Decode an instance of the registered type `type_name`.
    pub fn deserialize(
        &self,
        type_name: &str,
        bytes: &[u8],
        protocol: &dyn Protocol,
    ) -> Result<Model, CodecError> {
        let schema = self.registry.schema(type_name)?;
        let mut reader = protocol.reader(bytes, &self.config);
        read_model(self.registry, &schema, reader.as_mut(), &self.config)
    }
}

/// Encode `model` with `protocol` and default limits.
pub fn serialize(model: &Model, protocol: &dyn Protocol) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    {
        let mut writer = protocol.writer(&mut out);
        write_model(model, writer.as_mut())?;
    }
    Ok(out)
}

/// Decode an instance of `type_name` with `protocol` and default limits.
pub fn deserialize(
    registry: &Registry,
    type_name: &str,
    bytes: &[u8],
    protocol: &dyn Protocol,
) -> Result<Model, CodecError> {
    Codec::new(registry).deserialize(type_name, bytes, protocol)
}

/// Write `model` to an already open writer.
pub fn write_model(model: &Model, writer: &mut dyn ProtocolWriter) -> Result<(), CodecError> {
    Encoder::new(writer, CodecConfig::DEFAULT_MAX_DEPTH).write_struct(model, 1)
}

/// Read an instance of `schema` from an already open reader.
pub fn read_model(
    registry: &Registry,
    schema: &Arc<StructSchema>,
    reader: &mut dyn ProtocolReader,
    config: &CodecConfig,
) -> Result<Model, CodecError> {
    Decoder::new(registry, reader, config.max_depth).read_struct(schema, 1)
}

#[cfg(test)]
mod tests;
