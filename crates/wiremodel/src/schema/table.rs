// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Frozen per-type field tables.

use crate::field::{FieldDescriptor, FieldId};
use crate::model::Model;
use crate::types::{Value, WireParams};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

type ModelCheck = dyn Fn(&Model) -> Result<(), String> + Send + Sync;

/// Whole-instance validator, run after every field has been validated.
#[derive(Clone)]
pub struct ModelValidator {
    description: Arc<str>,
    check: Arc<ModelCheck>,
}

impl ModelValidator {
    pub fn new(
        description: impl AsRef<str>,
        check: impl Fn(&Model) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: Arc::from(description.as_ref()),
            check: Arc::new(check),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn validate(&self, model: &Model) -> Result<(), String> {
        (self.check)(model)
    }
}

impl fmt::Debug for ModelValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelValidator")
            .field(&self.description)
            .finish()
    }
}

/// One `(field_id, type_id, name, params, default)` wire spec tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct WireSpecEntry {
    pub field_id: FieldId,
    pub type_id: u8,
    /// Wire name.
    pub name: String,
    pub params: Option<WireParams>,
    pub default: Option<Value>,
}

/// Frozen, merged field table of one struct type.
///
/// Built once by the schema builder and shared through `Arc`. Fields keep
/// their merged order (inherited positions first); id-ordered access goes
/// through [`StructSchema::iter_by_id`].
#[derive(Debug)]
pub struct StructSchema {
    name: Arc<str>,
    is_union: bool,
    bases: Vec<String>,
    fields: Vec<FieldDescriptor>,
    by_id: BTreeMap<FieldId, usize>,
    by_name: HashMap<String, usize>,
    by_wire_name: HashMap<String, usize>,
    validators: Vec<ModelValidator>,
}

impl StructSchema {
    /// Index a merged field list. Ids must already be assigned and unique.
    pub(crate) fn freeze(
        name: &str,
        is_union: bool,
        bases: Vec<String>,
        fields: Vec<FieldDescriptor>,
        validators: Vec<ModelValidator>,
    ) -> Self {
        let mut by_id = BTreeMap::new();
        let mut by_name = HashMap::with_capacity(fields.len());
        let mut by_wire_name = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            by_id.insert(field.id, index);
            by_name.insert(field.attr_name.clone(), index);
            by_wire_name.insert(field.name.clone(), index);
        }
        Self {
            name: Arc::from(name),
            is_union,
            bases,
            fields,
            by_id,
            by_name,
            by_wire_name,
            validators,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_union(&self) -> bool {
        self.is_union
    }

    /// Direct base type names, in declaration order.
    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    /// Fields in merged order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields in ascending id order.
    pub fn iter_by_id(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.by_id.values().map(move |&index| &self.fields[index])
    }

    /// Look up a field by attribute name.
    pub fn field(&self, attr_name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(attr_name).map(|&index| &self.fields[index])
    }

    pub fn field_by_id(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.by_id.get(&id).map(|&index| &self.fields[index])
    }

    pub fn field_by_wire_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_wire_name.get(name).map(|&index| &self.fields[index])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Model-level validators, inherited ones first.
    pub fn validators(&self) -> &[ModelValidator] {
        &self.validators
    }

    /// Structural equality of two frozen tables: name, union flag and, per
    /// field, id, names, type, required flag and default. Validators are not
    /// compared.
    pub fn fields_equal(&self, other: &StructSchema) -> bool {
        self.name == other.name
            && self.is_union == other.is_union
            && self.fields.len() == other.fields.len()
            && self.iter_by_id().zip(other.iter_by_id()).all(|(a, b)| {
                a.id == b.id
                    && a.name == b.name
                    && a.attr_name == b.attr_name
                    && a.ty.type_equals(&b.ty)
                    && a.required == b.required
                    && a.default == b.default
            })
    }

    /// Wire spec tuples in ascending id order.
    pub fn wire_spec(&self) -> Vec<WireSpecEntry> {
        self.iter_by_id()
            .map(|field| {
                let wire = field.ty.to_wire();
                WireSpecEntry {
                    field_id: field.id,
                    type_id: wire.type_id,
                    name: field.name.clone(),
                    params: wire.params,
                    default: field.default.clone(),
                }
            })
            .collect()
    }
}

impl fmt::Display for StructSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_union { "union" } else { "struct" };
        write!(f, "{} {}", keyword, self.name)?;
        if !self.bases.is_empty() {
            write!(f, " extends {}", self.bases.join(", "))?;
        }
        f.write_str(" {")?;
        for (index, field) in self.iter_by_id().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            write!(f, " {}", field)?;
        }
        f.write_str(" }")
    }
}
