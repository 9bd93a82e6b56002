// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema composition: field merging, id assignment, frozen tables and the
//! type registry.

mod builder;
mod errors;
mod merger;
mod registry;
mod table;


pub use builder::SchemaBuilder;
pub use errors::{ConflictReason, FieldAttribute, FieldList, MergeConflict, SchemaError};
pub use merger::{assign_field_ids, merge, FieldMerger, MergeOutcome};
pub use registry::{Registry, StructDecl};
pub use table::{ModelValidator, StructSchema, WireSpecEntry};
