// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-level type kinds and their wire type ids.

use crate::protocol::WireType;
use std::fmt;

/// Kind of a declared field type.
///
/// Unions are kept distinct from structs at the schema level even though both
/// travel as [`WireType::Struct`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    I64,
    Double,
    Bool,
    /// Text or raw bytes (see `TypeDescriptor::String { binary }`).
    String,
    Utf8,
    Struct,
    Union,
    List,
    Set,
    Map,
}

impl TypeKind {
    /// Wire type used to encode values of this kind.
    pub const fn wire_type(self) -> WireType {
        match self {
            Self::I64 => WireType::I64,
            Self::Double => WireType::Double,
            Self::Bool => WireType::Bool,
            Self::String => WireType::String,
            Self::Utf8 => WireType::Utf8,
            Self::Struct | Self::Union => WireType::Struct,
            Self::List => WireType::List,
            Self::Set => WireType::Set,
            Self::Map => WireType::Map,
        }
    }

    /// Numeric wire type id (Thrift TType numbering).
    pub const fn type_id(self) -> u8 {
        self.wire_type().id()
    }

    /// Check if values of this kind carry nested type parameters.
    pub const fn is_parametric(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Union | Self::List | Self::Set | Self::Map
        )
    }

    /// Lowercase name, as used in rendered type names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::I64 => "i64",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Utf8 => "utf8",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
