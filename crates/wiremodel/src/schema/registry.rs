// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named struct declarations and their memoized schemas.
//!
//! Declarations refer to bases and struct-typed fields by name, so a type
//! may reference itself or a type declared later. [`Registry::register`]
//! builds immediately; [`Registry::declare`] defers the build until
//! [`Registry::schema`] or [`Registry::freeze_all`].

use super::builder::SchemaBuilder;
use super::errors::{FieldList, SchemaError};
use super::table::{ModelValidator, StructSchema, WireSpecEntry};
use crate::field::FieldDescriptor;
use crate::model::Model;
use crate::types::TypeDescriptor;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Declaration of one struct (or union) type.
#[derive(Debug, Clone)]
pub struct StructDecl {
    name: String,
    bases: Vec<String>,
    fields: Vec<FieldDescriptor>,
    is_union: bool,
    validators: Vec<ModelValidator>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            is_union: false,
            validators: Vec::new(),
        }
    }

    /// Declaration whose fields are rebuilt from wire spec tuples.
    ///
    /// Lets a type extend a struct known only by its wire spec: declare the
    /// result, then name it as a base. Struct-typed entries refer to their
    /// targets by registered name.
    pub fn from_wire_spec(
        name: impl Into<String>,
        entries: &[WireSpecEntry],
    ) -> Result<Self, SchemaError> {
        let fields = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                FieldDescriptor::from_wire_spec_entry(entry).map_err(|reason| {
                    SchemaError::InvalidField {
                        list: FieldList::Original,
                        index,
                        reason: format!("wire spec entry {}: {}", entry.name, reason),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name).fields(fields))
    }

    /// Add a base type. Bases merge in the order they are added.
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Declare a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare several fields.
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Declare the type as a union: at most one field set at a time.
    pub fn union(mut self) -> Self {
        self.is_union = true;
        self
    }

    /// Add a whole-instance validator. Derived types inherit it.
    pub fn validator(
        mut self,
        description: impl AsRef<str>,
        check: impl Fn(&Model) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(ModelValidator::new(description, check));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    /// Fields declared on this type only.
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn is_union(&self) -> bool {
        self.is_union
    }

    pub(crate) fn declared_validators(&self) -> &[ModelValidator] {
        &self.validators
    }
}

/// Thread-safe home of struct declarations and frozen schemas.
#[derive(Debug, Default)]
pub struct Registry {
    decls: RwLock<HashMap<String, Arc<StructDecl>>>,
    schemas: RwLock<HashMap<String, Arc<StructSchema>>>,
    /// Bumped on every redefinition; builds started before a bump are not cached.
    generation: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration without building it.
    ///
    /// Redefining a name drops every cached schema, since any of them may
    /// have inherited from or referenced the old definition.
    pub fn declare(&self, decl: StructDecl) {
        let name = decl.name.clone();
        let previous = self.decls.write().insert(name.clone(), Arc::new(decl));
        if previous.is_some() {
            self.invalidate();
            log::debug!("[registry] redefined {}, schema cache cleared", name);
        }
    }

    /// Declare and build a type, failing fast on any declaration error.
    ///
    /// On failure the previous definition (if any) is restored.
    pub fn register(&self, decl: StructDecl) -> Result<Arc<StructSchema>, SchemaError> {
        let name = decl.name.clone();
        let previous = self.decls.read().get(&name).cloned();
        self.declare(decl);

        match self.schema(&name) {
            Ok(schema) => Ok(schema),
            Err(err) => {
                {
                    let mut decls = self.decls.write();
                    match previous {
                        Some(previous) => decls.insert(name.clone(), previous),
                        None => decls.remove(&name),
                    };
                }
                self.invalidate();
                log::debug!("[registry] rejected {}: {}", name, err);
                Err(err)
            }
        }
    }

    /// Frozen schema of `name`, building it (and its bases) on first use.
    pub fn schema(&self, name: &str) -> Result<Arc<StructSchema>, SchemaError> {
        SchemaBuilder::new(self).build(name)
    }

    /// Build every declared type. Returns the number of types.
    pub fn freeze_all(&self) -> Result<usize, SchemaError> {
        let names = self.names();
        let mut builder = SchemaBuilder::new(self);
        for name in &names {
            builder.build(name)?;
        }
        Ok(names.len())
    }

    /// Declared type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.decls.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.decls.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.read().is_empty()
    }

    /// Wire spec of `name`, in ascending id order.
    pub fn wire_spec(&self, name: &str) -> Result<Vec<WireSpecEntry>, SchemaError> {
        Ok(self.schema(name)?.wire_spec())
    }

    /// Struct types reachable from `root` through field types.
    ///
    /// The root comes first, followed by referenced types in depth-first
    /// discovery order, each listed once. Recursive references terminate.
    pub fn dependencies(&self, root: &str) -> Result<Vec<Arc<StructSchema>>, SchemaError> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        self.collect_dependencies(root, &mut seen, &mut ordered)?;
        Ok(ordered)
    }

    fn collect_dependencies(
        &self,
        name: &str,
        seen: &mut HashSet<String>,
        ordered: &mut Vec<Arc<StructSchema>>,
    ) -> Result<(), SchemaError> {
        if !seen.insert(name.to_string()) {
            return Ok(());
        }
        let schema = self.schema(name)?;
        ordered.push(Arc::clone(&schema));

        let mut referenced = Vec::new();
        for field in schema.fields() {
            collect_targets(&field.ty, &mut referenced);
        }
        for target in referenced {
            self.collect_dependencies(&target, seen, ordered)?;
        }
        Ok(())
    }

    pub(crate) fn declaration(&self, name: &str) -> Option<Arc<StructDecl>> {
        self.decls.read().get(name).cloned()
    }

    pub(crate) fn cached(&self, name: &str) -> Option<Arc<StructSchema>> {
        self.schemas.read().get(name).cloned()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Memoize a freshly built schema. The first insert wins; a build that
    /// raced with a redefinition is returned but not cached.
    pub(crate) fn insert_frozen(&self, schema: StructSchema, generation: u64) -> Arc<StructSchema> {
        let mut schemas = self.schemas.write();
        if self.generation() != generation {
            log::debug!("[registry] {} built against a stale generation", schema.name());
            return Arc::new(schema);
        }
        let entry = schemas
            .entry(schema.name().to_string())
            .or_insert_with(|| Arc::new(schema));
        Arc::clone(entry)
    }

    fn invalidate(&self) {
        let mut schemas = self.schemas.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        schemas.clear();
    }
}

/// Names of struct types referenced by `ty`, including inside containers.
pub(crate) fn collect_targets(ty: &TypeDescriptor, out: &mut Vec<String>) {
    if let Some(target) = ty.target() {
        out.push(target.name().to_string());
    }
    for element in ty.elements() {
        collect_targets(&element.ty, out);
    }
}
