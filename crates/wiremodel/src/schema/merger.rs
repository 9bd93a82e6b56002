// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field list merging and field id assignment.
//!
//! [`FieldMerger`] reconciles an *original* list (already valid: positive,
//! unique ids and unique names) with a *to-merge* list (ids may still be
//! unassigned). A to-merge field matches the original field sharing its wire
//! name, attribute name or assigned id. A matched pair merges when id (or an
//! unassigned to-merge id), both names and the type agree; the to-merge field
//! then replaces the original in place and keeps the original's id. Any
//! disagreement is a [`MergeConflict`].

use super::errors::{ConflictReason, FieldAttribute, FieldList, MergeConflict, SchemaError};
use crate::field::{FieldDescriptor, FieldId};
use std::collections::{HashMap, HashSet};

/// Result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Original positions first (with matched fields substituted), then the
    /// unmatched to-merge fields in their relative order.
    pub fields: Vec<FieldDescriptor>,
    /// Conflicts resolved in favor of the to-merge field. Only ever
    /// non-empty when overwriting on conflict.
    pub conflicts: Vec<MergeConflict>,
}

/// Merges a to-merge field list into an original field list.
#[derive(Debug)]
pub struct FieldMerger<'a> {
    original: &'a [FieldDescriptor],
    to_merge: &'a [FieldDescriptor],
    overwrite_on_conflict: bool,
}

impl<'a> FieldMerger<'a> {
    /// Validate both lists and prepare a merge.
    ///
    /// The original list must have positive ids; the to-merge list may carry
    /// unassigned ids, and may repeat them among unassigned fields. Names are
    /// never allowed to repeat within a list.
    pub fn new(
        original: &'a [FieldDescriptor],
        to_merge: &'a [FieldDescriptor],
    ) -> Result<Self, SchemaError> {
        check_fields_valid(original, FieldList::Original, false)?;
        check_fields_valid(to_merge, FieldList::ToMerge, true)?;
        check_no_duplicates(original, FieldList::Original, false)?;
        check_no_duplicates(to_merge, FieldList::ToMerge, true)?;
        Ok(Self {
            original,
            to_merge,
            overwrite_on_conflict: false,
        })
    }

    /// Record conflicts and let the to-merge field win instead of failing.
    pub fn overwrite_on_conflict(mut self, overwrite: bool) -> Self {
        self.overwrite_on_conflict = overwrite;
        self
    }

    /// Run the merge.
    pub fn merge(&self) -> Result<MergeOutcome, SchemaError> {
        let mut claimed: Vec<Option<usize>> = vec![None; self.original.len()];
        let mut matched = vec![false; self.to_merge.len()];
        let mut conflicts = Vec::new();

        for (to_merge_index, field) in self.to_merge.iter().enumerate() {
            let candidates = self.candidates(field);
            if candidates.len() > 1 {
                return Err(SchemaError::AmbiguousMerge {
                    field: field.name.clone(),
                    candidates,
                });
            }
            let Some(&original_index) = candidates.first() else {
                continue;
            };
            if claimed[original_index].is_some() {
                return Err(SchemaError::AmbiguousMerge {
                    field: field.name.clone(),
                    candidates,
                });
            }

            let original = &self.original[original_index];
            if let Some(reason) = mismatch(original, field) {
                let conflict = MergeConflict {
                    reason,
                    original_index,
                    to_merge_index,
                    original: original.clone(),
                    to_merge: field.clone(),
                };
                if !self.overwrite_on_conflict {
                    return Err(conflict.into());
                }
                log::warn!("[merge] overwriting on conflict, {}", conflict);
                conflicts.push(conflict);
            }
            claimed[original_index] = Some(to_merge_index);
            matched[to_merge_index] = true;
        }

        let mut fields = Vec::with_capacity(self.original.len() + self.to_merge.len());
        for (original, claim) in self.original.iter().zip(&claimed) {
            match claim {
                Some(to_merge_index) => {
                    let mut field = self.to_merge[*to_merge_index].clone();
                    if field.is_unassigned() {
                        field.id = original.id;
                    }
                    fields.push(field);
                }
                None => fields.push(original.clone()),
            }
        }
        fields.extend(
            self.to_merge
                .iter()
                .zip(&matched)
                .filter(|(_, was_matched)| !**was_matched)
                .map(|(field, _)| field.clone()),
        );

        Ok(MergeOutcome { fields, conflicts })
    }

    /// Original fields sharing the wire name, attribute name or assigned id.
    fn candidates(&self, field: &FieldDescriptor) -> Vec<usize> {
        self.original
            .iter()
            .enumerate()
            .filter(|(_, original)| {
                original.name == field.name
                    || original.attr_name == field.attr_name
                    || (!field.is_unassigned() && original.id == field.id)
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// Merge `to_merge` into `original`.
///
/// Without `overwrite_on_conflict` the first conflict aborts the merge.
pub fn merge(
    original: &[FieldDescriptor],
    to_merge: &[FieldDescriptor],
    overwrite_on_conflict: bool,
) -> Result<MergeOutcome, SchemaError> {
    FieldMerger::new(original, to_merge)?
        .overwrite_on_conflict(overwrite_on_conflict)
        .merge()
}

/// Give every unassigned field the smallest free positive id.
///
/// Unassigned fields are served in declaration order, so the field declared
/// first claims the lowest free id regardless of its position or name.
pub fn assign_field_ids(fields: &mut [FieldDescriptor]) -> Result<(), SchemaError> {
    let mut taken: HashSet<FieldId> = fields
        .iter()
        .filter(|field| !field.is_unassigned())
        .map(|field| field.id)
        .collect();

    let mut pending: Vec<usize> = (0..fields.len())
        .filter(|&index| fields[index].is_unassigned())
        .collect();
    pending.sort_by_key(|&index| fields[index].declaration_order);

    let mut next: FieldId = 1;
    for index in pending {
        while taken.contains(&next) {
            next = next.checked_add(1).ok_or_else(|| SchemaError::InvalidField {
                list: FieldList::ToMerge,
                index,
                reason: "no free field id left".to_string(),
            })?;
        }
        taken.insert(next);
        fields[index].id = next;
    }
    Ok(())
}

fn mismatch(original: &FieldDescriptor, to_merge: &FieldDescriptor) -> Option<ConflictReason> {
    if !to_merge.is_unassigned() && to_merge.id != original.id {
        Some(ConflictReason::FieldIdMismatch)
    } else if to_merge.name != original.name {
        Some(ConflictReason::WireNameMismatch)
    } else if to_merge.attr_name != original.attr_name {
        Some(ConflictReason::AttrNameMismatch)
    } else if !to_merge.ty.type_equals(&original.ty) {
        Some(ConflictReason::TypeMismatch)
    } else {
        None
    }
}

fn check_fields_valid(
    fields: &[FieldDescriptor],
    list: FieldList,
    allow_unassigned: bool,
) -> Result<(), SchemaError> {
    for (index, field) in fields.iter().enumerate() {
        let reason = if field.attr_name.is_empty() {
            "attribute name is empty".to_string()
        } else if field.name.is_empty() {
            "wire name is empty".to_string()
        } else if field.is_unassigned() && !allow_unassigned {
            format!("invalid field id {}", field.id)
        } else {
            continue;
        };
        return Err(SchemaError::InvalidField {
            list,
            index,
            reason,
        });
    }
    Ok(())
}

fn check_no_duplicates(
    fields: &[FieldDescriptor],
    list: FieldList,
    allow_unassigned_duplicates: bool,
) -> Result<(), SchemaError> {
    let mut ids: HashMap<FieldId, usize> = HashMap::new();
    let mut wire_names: HashMap<&str, usize> = HashMap::new();
    let mut attr_names: HashMap<&str, usize> = HashMap::new();

    let duplicate = |attribute, value: String, first, duplicate| SchemaError::DuplicateField {
        list,
        attribute,
        value,
        first,
        duplicate,
    };

    for (index, field) in fields.iter().enumerate() {
        if let Some(&first) = wire_names.get(field.name.as_str()) {
            return Err(duplicate(FieldAttribute::WireName, field.name.clone(), first, index));
        }
        wire_names.insert(&field.name, index);

        if let Some(&first) = attr_names.get(field.attr_name.as_str()) {
            return Err(duplicate(
                FieldAttribute::AttrName,
                field.attr_name.clone(),
                first,
                index,
            ));
        }
        attr_names.insert(&field.attr_name, index);

        if allow_unassigned_duplicates && field.is_unassigned() {
            continue;
        }
        if let Some(&first) = ids.get(&field.id) {
            return Err(duplicate(FieldAttribute::FieldId, field.id.to_string(), first, index));
        }
        ids.insert(field.id, index);
    }
    Ok(())
}
