// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composition of base and declared fields into frozen schemas.

use super::errors::SchemaError;
use super::merger::{assign_field_ids, merge};
use super::registry::{collect_targets, Registry, StructDecl};
use super::table::StructSchema;
use crate::field::FieldDescriptor;
use std::sync::Arc;

/// Builds frozen schemas out of registry declarations.
///
/// The builder keeps the chain of types currently being composed so that a
/// type inheriting from itself is reported instead of recursing forever.
pub struct SchemaBuilder<'r> {
    registry: &'r Registry,
    stack: Vec<String>,
    generation: u64,
}

impl<'r> SchemaBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            stack: Vec::new(),
            generation: registry.generation(),
        }
    }

    /// Frozen schema of `name`, from cache or freshly composed.
    pub fn build(&mut self, name: &str) -> Result<Arc<StructSchema>, SchemaError> {
        if let Some(schema) = self.registry.cached(name) {
            return Ok(schema);
        }

        if let Some(start) = self.stack.iter().position(|entry| entry == name) {
            let mut cycle = self.stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(SchemaError::CyclicSchema { cycle });
        }

        let decl = self
            .registry
            .declaration(name)
            .ok_or_else(|| SchemaError::UndefinedType(name.to_string()))?;

        self.stack.push(name.to_string());
        let composed = self.compose(&decl);
        self.stack.pop();

        let schema = composed?;
        log::debug!(
            "[schema] froze {} ({} fields, {} bases)",
            schema.name(),
            schema.len(),
            schema.bases().len()
        );
        Ok(self.registry.insert_frozen(schema, self.generation))
    }

    fn compose(&mut self, decl: &StructDecl) -> Result<StructSchema, SchemaError> {
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut validators = Vec::new();

        for base in decl.bases() {
            let base_schema = self.build(base)?;
            fields = merge(&fields, base_schema.fields(), false)?.fields;
            validators.extend(base_schema.validators().iter().cloned());
        }

        let mut fields = merge(&fields, decl.declared_fields(), false)?.fields;
        assign_field_ids(&mut fields)?;
        self.check_references(&fields)?;
        validators.extend(decl.declared_validators().iter().cloned());

        Ok(StructSchema::freeze(
            decl.name(),
            decl.is_union(),
            decl.bases().to_vec(),
            fields,
            validators,
        ))
    }

    /// Struct references only need to be declared; they are built lazily so
    /// recursive field types do not recurse here.
    fn check_references(&self, fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
        let mut targets = Vec::new();
        for field in fields {
            collect_targets(&field.ty, &mut targets);
        }
        match targets.into_iter().find(|name| !self.registry.contains(name)) {
            Some(missing) => Err(SchemaError::UndefinedType(missing)),
            None => Ok(()),
        }
    }
}
