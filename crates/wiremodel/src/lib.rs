// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wiremodel - declarative struct schemas over a Thrift-style wire protocol
//!
//! Struct types are declared as plain data (named fields carrying wire type
//! tags, optional ids, defaults, validators and base types). The schema
//! engine merges inherited and declared fields into one frozen field table
//! per type, assigning ids to fields declared without one. Model instances
//! store field values sparsely by id, and the codec walks a frozen table
//! against any [`protocol::Protocol`] implementation.
//!
//! ## Quick Start
//!
//! ```rust
//! use wiremodel::{BinaryProtocol, FieldDescriptor, Registry, StructDecl, TypeDescriptor};
//!
//! # fn main() -> wiremodel::Result<()> {
//! let registry = Registry::new();
//! registry.register(
//!     StructDecl::new("Base").field(FieldDescriptor::new("x", TypeDescriptor::I64).with_id(1)),
//! )?;
//! let schema = registry.register(
//!     StructDecl::new("Derived")
//!         .extends("Base")
//!         .field(FieldDescriptor::new("y", TypeDescriptor::string())),
//! )?;
//! assert_eq!(schema.field("y").map(|f| f.id), Some(2));
//!
//! let mut model = wiremodel::Model::new(&schema);
//! model.set("x", 7i64)?;
//! model.set("y", "seven")?;
//! model.validate()?;
//!
//! let bytes = wiremodel::serialize(&model, &BinaryProtocol)?;
//! let decoded = wiremodel::deserialize(&registry, "Derived", &bytes, &BinaryProtocol)?;
//! assert_eq!(decoded, model);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  StructDecl (bases + declared FieldDescriptors)             |
//! +-------------------------------------------------------------+
//! |  Registry -> SchemaBuilder -> FieldMerger -> StructSchema   |
//! +-------------------------------------------------------------+
//! |  Model (sparse values by field id, validate)                |
//! +-------------------------------------------------------------+
//! |  Codec -> ProtocolWriter / ProtocolReader (binary, compact) |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - wire type descriptors and dynamic values
//! - [`field`] - field descriptors, declaration order, validators
//! - [`schema`] - field merging, schema building, the type registry
//! - [`model`] - model instances and validation
//! - [`codec`] - serialize/deserialize drivers and decode limits
//! - [`protocol`] - the protocol boundary and reference protocols

pub mod codec;
mod error;
pub mod field;
pub mod model;
pub mod protocol;
pub mod schema;
pub mod types;

pub use codec::{deserialize, serialize, Codec, CodecConfig, CodecError, ConfigError};
pub use error::{Error, Result};
pub use field::{DeclarationCounter, FieldDescriptor, FieldId, Validator, UNASSIGNED_FIELD_ID};
pub use model::{Model, ModelError};
pub use protocol::{BinaryProtocol, CompactProtocol, Protocol, ProtocolError};
pub use schema::{
    assign_field_ids, merge, FieldMerger, MergeConflict, MergeOutcome, Registry, SchemaBuilder,
    SchemaError, StructDecl, StructSchema, WireSpecEntry,
};
pub use types::{ElementDescriptor, StructRef, TypeDescriptor, TypeKind, Value};
