// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON-Schema output for wiremodel struct types.
//!
//! Consumes the read-only side of a [`wiremodel::Registry`]: frozen field
//! tables and the struct dependency closure of a root type.
//!
//! # Example
//!
//! ```rust
//! use wiremodel::{FieldDescriptor, Registry, StructDecl, TypeDescriptor};
//! use wiremodel_schema::JsonSchemaWriter;
//!
//! let registry = Registry::new();
//! let point = StructDecl::new("Point")
//!     .field(FieldDescriptor::new("x", TypeDescriptor::I64).required());
//! registry.register(point).expect("register");
//!
//! let ast = JsonSchemaWriter::new(&registry)
//!     .description("a point")
//!     .schema_ast("Point")
//!     .expect("schema");
//! assert_eq!(ast["required"][0], "x");
//! assert_eq!(ast["definitions"]["Point"]["properties"]["x"]["type"], "integer");
//! ```

pub mod json;

pub use json::{JsonSchemaError, JsonSchemaWriter, DRAFT_04};
