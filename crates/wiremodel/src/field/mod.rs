// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field declarations.

mod descriptor;
pub mod validators;

pub use descriptor::{DeclarationCounter, FieldDescriptor, FieldId, UNASSIGNED_FIELD_ID};
pub use validators::Validator;
