// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors and the declaration-order counter.

use crate::field::Validator;
use crate::schema::WireSpecEntry;
use crate::types::{TypeDescriptor, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Wire field id. Valid ids are positive.
pub type FieldId = i16;

/// Sentinel id of a field declared without an explicit id.
pub const UNASSIGNED_FIELD_ID: FieldId = -1;

/// Monotonic counter stamping each declared field with its declaration order.
///
/// The process-wide instance ([`DeclarationCounter::global`]) starts at zero
/// when the process starts and is never reset. Separate instances only make
/// sense for isolated tests.
#[derive(Debug, Default)]
pub struct DeclarationCounter(AtomicU64);

static GLOBAL_DECLARATIONS: DeclarationCounter = DeclarationCounter::new();

impl DeclarationCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// The process-wide counter used by [`FieldDescriptor::new`].
    pub fn global() -> &'static DeclarationCounter {
        &GLOBAL_DECLARATIONS
    }

    /// Take the next declaration stamp.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// One declared struct field.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Wire field id, or [`UNASSIGNED_FIELD_ID`].
    pub id: FieldId,
    /// Wire-visible field name.
    pub name: String,
    /// Accessor name used by model instances.
    pub attr_name: String,
    /// Field type.
    pub ty: TypeDescriptor,
    /// Default value, reported by `Model::get_or_default`; never written.
    pub default: Option<Value>,
    /// Checked by `Model::validate` only.
    pub required: bool,
    /// Validators run against the stored value (or `None` when unset).
    pub validators: Vec<Arc<dyn Validator>>,
    /// Declaration stamp; breaks ties during id assignment.
    pub declaration_order: u64,
}

impl FieldDescriptor {
    /// Declare a field named `attr_name`, stamped from the global counter.
    ///
    /// The wire name defaults to the attribute name and the id is unassigned.
    pub fn new(attr_name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self::declared_in(DeclarationCounter::global(), attr_name, ty)
    }

    /// Declare a field stamped from a specific counter.
    pub fn declared_in(
        counter: &DeclarationCounter,
        attr_name: impl Into<String>,
        ty: TypeDescriptor,
    ) -> Self {
        let attr_name = attr_name.into();
        Self {
            id: UNASSIGNED_FIELD_ID,
            name: attr_name.clone(),
            attr_name,
            ty,
            default: None,
            required: false,
            validators: Vec::new(),
            declaration_order: counter.next(),
        }
    }

    /// Rebuild a field from a wire spec tuple, such as one returned by
    /// [`StructSchema::wire_spec`](crate::schema::StructSchema::wire_spec).
    ///
    /// The wire name doubles as the attribute name. The field comes back
    /// optional and without validators; the tuple does not record either.
    pub fn from_wire_spec_entry(entry: &WireSpecEntry) -> Result<Self, String> {
        if entry.field_id < 1 {
            return Err(format!("field id {} is not positive", entry.field_id));
        }
        let ty = TypeDescriptor::from_wire(entry.type_id, entry.params.as_ref())?;
        if let Some(default) = &entry.default {
            ty.check(default)
                .map_err(|reason| format!("default value: {}", reason))?;
        }
        let mut field = Self::new(entry.name.clone(), ty).with_id(entry.field_id);
        field.default = entry.default.clone();
        Ok(field)
    }

    /// Set the wire field id.
    pub fn with_id(mut self, id: FieldId) -> Self {
        self.id = id;
        self
    }

    /// Set a wire name different from the attribute name.
    pub fn wire_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a validator.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Check if the id is still unassigned.
    pub fn is_unassigned(&self) -> bool {
        self.id < 1
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("attr_name", &self.attr_name)
            .field("ty", &self.ty.type_name())
            .field("default", &self.default)
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .field("declaration_order", &self.declaration_order)
            .finish()
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.id, self.ty, self.name)?;
        if self.attr_name != self.name {
            write!(f, " (attr {})", self.attr_name)?;
        }
        Ok(())
    }
}
