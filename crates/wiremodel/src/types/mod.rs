// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire type descriptors and dynamic values.

mod descriptor;
mod type_kind;
mod value;

pub use descriptor::{ElementDescriptor, StructRef, TypeDescriptor, WireParams, WireTypeSpec};
pub use type_kind::TypeKind;
pub use value::{FromValue, Value};
