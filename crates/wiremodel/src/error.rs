// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level error type.

use crate::codec::{CodecError, ConfigError};
use crate::model::ModelError;
use crate::protocol::ProtocolError;
use crate::schema::SchemaError;
use std::fmt;

/// Any failure surfaced by the public API.
#[derive(Debug)]
pub enum Error {
    /// Declaration, merge or composition failure.
    Schema(SchemaError),
    /// Instance access or validation failure.
    Model(ModelError),
    /// Encoding or decoding failure.
    Codec(CodecError),
    /// Codec configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "schema error: {}", e),
            Self::Model(e) => write!(f, "model error: {}", e),
            Self::Codec(e) => write!(f, "codec error: {}", e),
            Self::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Self::Codec(CodecError::Protocol(err))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Convenient alias for results using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
