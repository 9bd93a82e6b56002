// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for field merging and schema building.
//!
//! Every variant is a declaration error: it is reported when a type is
//! registered or first built, never retried.

use crate::field::FieldDescriptor;
use std::fmt;

/// Which input list of a merge an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldList {
    /// The already-valid (inherited) list.
    Original,
    /// The list being merged in.
    ToMerge,
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("original"),
            Self::ToMerge => f.write_str("to_merge"),
        }
    }
}

/// Field attribute that collided in a duplicate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAttribute {
    FieldId,
    WireName,
    AttrName,
}

impl fmt::Display for FieldAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldId => f.write_str("field id"),
            Self::WireName => f.write_str("wire name"),
            Self::AttrName => f.write_str("attribute name"),
        }
    }
}

/// Why two matched fields could not be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    FieldIdMismatch,
    WireNameMismatch,
    AttrNameMismatch,
    TypeMismatch,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldIdMismatch => f.write_str("field id mismatch"),
            Self::WireNameMismatch => f.write_str("wire name mismatch"),
            Self::AttrNameMismatch => f.write_str("attribute name mismatch"),
            Self::TypeMismatch => f.write_str("type mismatch"),
        }
    }
}

/// A matched pair of fields that disagree.
#[derive(Debug, Clone)]
pub struct MergeConflict {
    pub reason: ConflictReason,
    /// Position in the original list.
    pub original_index: usize,
    /// Position in the to-merge list.
    pub to_merge_index: usize,
    pub original: FieldDescriptor,
    pub to_merge: FieldDescriptor,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: original field {} ({}) vs to_merge field {} ({})",
            self.reason, self.original_index, self.original, self.to_merge_index, self.to_merge
        )
    }
}

/// Schema declaration failures.
#[derive(Debug, Clone)]
pub enum SchemaError {
    /// Malformed field (missing name, non-positive id in an original list,
    /// id space exhausted).
    InvalidField {
        list: FieldList,
        index: usize,
        reason: String,
    },
    /// Two fields of one list share an id or a name.
    DuplicateField {
        list: FieldList,
        attribute: FieldAttribute,
        value: String,
        first: usize,
        duplicate: usize,
    },
    /// A to-merge field matched several original fields, or an original
    /// field was matched twice.
    AmbiguousMerge {
        field: String,
        candidates: Vec<usize>,
    },
    /// Matched fields disagree on id, names or type.
    MergeConflict(Box<MergeConflict>),
    /// A type inherits from itself, directly or indirectly.
    CyclicSchema { cycle: Vec<String> },
    /// A base type or struct reference names an unregistered type.
    UndefinedType(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidField {
                list,
                index,
                reason,
            } => write!(f, "{} field number {}: {}", list, index, reason),
            Self::DuplicateField {
                list,
                attribute,
                value,
                first,
                duplicate,
            } => write!(
                f,
                "{} field {} is a duplicate of field {} by {} ({})",
                list, duplicate, first, attribute, value
            ),
            Self::AmbiguousMerge { field, candidates } => write!(
                f,
                "field {} matches several original fields: {:?}",
                field, candidates
            ),
            Self::MergeConflict(conflict) => write!(f, "merge conflict, {}", conflict),
            Self::CyclicSchema { cycle } => {
                write!(f, "cyclic base types: {}", cycle.join(" -> "))
            }
            Self::UndefinedType(name) => write!(f, "undefined struct type: {}", name),
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<MergeConflict> for SchemaError {
    fn from(conflict: MergeConflict) -> Self {
        Self::MergeConflict(Box::new(conflict))
    }
}
