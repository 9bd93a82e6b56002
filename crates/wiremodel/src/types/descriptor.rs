// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for declared fields.
//!
//! A [`TypeDescriptor`] is a tagged variant: scalars carry nothing, lists and
//! sets carry one [`ElementDescriptor`], maps carry two, and structs/unions
//! carry a non-owning [`StructRef`] resolved through the registry.

use crate::field::Validator;
use crate::protocol::WireType;
use crate::types::{TypeKind, Value};
use std::fmt;
use std::sync::Arc;

/// Non-owning reference to a struct type, by registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructRef {
    name: Arc<str>,
}

impl StructRef {
    /// Create a reference to the struct type registered as `name`.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// Referenced type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

impl fmt::Display for StructRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Element type of a container, with its own element-level validators.
#[derive(Debug, Clone)]
pub struct ElementDescriptor {
    /// Element type.
    pub ty: TypeDescriptor,
    /// Validators run against every element (or every key/value of a map).
    pub validators: Vec<Arc<dyn Validator>>,
}

impl ElementDescriptor {
    /// Create an element descriptor without validators.
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            validators: Vec::new(),
        }
    }

    /// Add an element-level validator.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }
}

impl From<TypeDescriptor> for ElementDescriptor {
    fn from(ty: TypeDescriptor) -> Self {
        Self::new(ty)
    }
}

/// Wire type of one declared field.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    I64,
    Double,
    Bool,
    /// Thrift STRING; `binary` values are raw bytes instead of text.
    String { binary: bool },
    Utf8,
    Struct(StructRef),
    /// A struct of which at most one field is set. Travels as a struct.
    Union { target: StructRef, boxed: bool },
    List(Box<ElementDescriptor>),
    Set(Box<ElementDescriptor>),
    Map {
        key: Box<ElementDescriptor>,
        value: Box<ElementDescriptor>,
    },
}

/// Position-encoded form of a type, as found in a wire spec entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTypeSpec {
    /// Wire type id.
    pub type_id: u8,
    /// Nested parameters (`None` for scalars).
    pub params: Option<WireParams>,
}

/// Type parameters of a parametric wire type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireParams {
    /// List/set element: `(type_id, params)`.
    Element {
        type_id: u8,
        params: Option<Box<WireParams>>,
    },
    /// Map: `(key_type_id, key_params, value_type_id, value_params)`.
    Map {
        key_type_id: u8,
        key_params: Option<Box<WireParams>>,
        value_type_id: u8,
        value_params: Option<Box<WireParams>>,
    },
    /// Struct or union: the referenced type, resolved through the registry.
    Struct { name: Arc<str> },
}

impl TypeDescriptor {
    /// Text string.
    pub const fn string() -> Self {
        Self::String { binary: false }
    }

    /// Raw byte string.
    pub const fn binary() -> Self {
        Self::String { binary: true }
    }

    /// Struct-typed field referencing `name`.
    pub fn struct_ref(name: impl AsRef<str>) -> Self {
        Self::Struct(StructRef::new(name))
    }

    /// Boxed union referencing `name`.
    pub fn union(name: impl AsRef<str>) -> Self {
        Self::Union {
            target: StructRef::new(name),
            boxed: true,
        }
    }

    /// Unboxed union referencing `name`.
    pub fn unboxed_union(name: impl AsRef<str>) -> Self {
        Self::Union {
            target: StructRef::new(name),
            boxed: false,
        }
    }

    /// List of `element`.
    pub fn list(element: impl Into<ElementDescriptor>) -> Self {
        Self::List(Box::new(element.into()))
    }

    /// Set of `element`.
    pub fn set(element: impl Into<ElementDescriptor>) -> Self {
        Self::Set(Box::new(element.into()))
    }

    /// Map from `key` to `value`.
    pub fn map(key: impl Into<ElementDescriptor>, value: impl Into<ElementDescriptor>) -> Self {
        Self::Map {
            key: Box::new(key.into()),
            value: Box::new(value.into()),
        }
    }

    /// Type kind.
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::I64 => TypeKind::I64,
            Self::Double => TypeKind::Double,
            Self::Bool => TypeKind::Bool,
            Self::String { .. } => TypeKind::String,
            Self::Utf8 => TypeKind::Utf8,
            Self::Struct(_) => TypeKind::Struct,
            Self::Union { .. } => TypeKind::Union,
            Self::List(_) => TypeKind::List,
            Self::Set(_) => TypeKind::Set,
            Self::Map { .. } => TypeKind::Map,
        }
    }

    /// Wire type used for values of this type.
    pub const fn wire_type(&self) -> WireType {
        self.kind().wire_type()
    }

    /// Referenced struct type, for structs and unions.
    pub fn target(&self) -> Option<&StructRef> {
        match self {
            Self::Struct(target) | Self::Union { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Nested element descriptors: one for list/set, key then value for map.
    pub fn elements(&self) -> impl Iterator<Item = &ElementDescriptor> {
        let (first, second) = match self {
            Self::List(element) | Self::Set(element) => (Some(element.as_ref()), None),
            Self::Map { key, value } => (Some(key.as_ref()), Some(value.as_ref())),
            _ => (None, None),
        };
        first.into_iter().chain(second)
    }

    /// Structural equality: same kind and pairwise equal parameters.
    ///
    /// Validators are not part of the type and are ignored.
    pub fn type_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String { binary: a }, Self::String { binary: b }) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            (
                Self::Union {
                    target: a,
                    boxed: boxed_a,
                },
                Self::Union {
                    target: b,
                    boxed: boxed_b,
                },
            ) => a == b && boxed_a == boxed_b,
            (Self::List(a), Self::List(b)) | (Self::Set(a), Self::Set(b)) => {
                a.ty.type_equals(&b.ty)
            }
            (
                Self::Map {
                    key: key_a,
                    value: value_a,
                },
                Self::Map {
                    key: key_b,
                    value: value_b,
                },
            ) => key_a.ty.type_equals(&key_b.ty) && value_a.ty.type_equals(&value_b.ty),
            _ => !self.kind().is_parametric() && self.kind() == other.kind(),
        }
    }

    /// Position-encoded `(type_id, params)` form.
    pub fn to_wire(&self) -> WireTypeSpec {
        WireTypeSpec {
            type_id: self.kind().type_id(),
            params: self.wire_params(),
        }
    }

    fn wire_params(&self) -> Option<WireParams> {
        match self {
            Self::List(element) | Self::Set(element) => Some(WireParams::Element {
                type_id: element.ty.kind().type_id(),
                params: element.ty.wire_params().map(Box::new),
            }),
            Self::Map { key, value } => Some(WireParams::Map {
                key_type_id: key.ty.kind().type_id(),
                key_params: key.ty.wire_params().map(Box::new),
                value_type_id: value.ty.kind().type_id(),
                value_params: value.ty.wire_params().map(Box::new),
            }),
            Self::Struct(target) | Self::Union { target, .. } => Some(WireParams::Struct {
                name: target.shared_name(),
            }),
            _ => None,
        }
    }

    /// Rebuild a descriptor from its position-encoded wire form.
    ///
    /// Only what the wire form records comes back: type id 11 is read as a
    /// text string, and type id 12 as a plain struct reference resolved by
    /// name through the registry. Element validators are empty.
    pub fn from_wire(type_id: u8, params: Option<&WireParams>) -> Result<Self, String> {
        let wire_type = WireType::from_id(type_id).map_err(|e| e.to_string())?;
        let ty = match (wire_type, params) {
            (WireType::Bool, None) => Self::Bool,
            (WireType::Double, None) => Self::Double,
            (WireType::I64, None) => Self::I64,
            (WireType::String, None) => Self::string(),
            (WireType::Utf8, None) => Self::Utf8,
            (WireType::Struct, Some(WireParams::Struct { name })) => {
                Self::Struct(StructRef { name: Arc::clone(name) })
            }
            (WireType::List, Some(WireParams::Element { type_id, params })) => {
                Self::list(Self::from_wire(*type_id, params.as_deref())?)
            }
            (WireType::Set, Some(WireParams::Element { type_id, params })) => {
                Self::set(Self::from_wire(*type_id, params.as_deref())?)
            }
            (
                WireType::Map,
                Some(WireParams::Map {
                    key_type_id,
                    key_params,
                    value_type_id,
                    value_params,
                }),
            ) => Self::map(
                Self::from_wire(*key_type_id, key_params.as_deref())?,
                Self::from_wire(*value_type_id, value_params.as_deref())?,
            ),
            (WireType::Byte | WireType::I16 | WireType::I32, _) => {
                return Err(format!("{} fields are not supported", wire_type));
            }
            (_, None) => return Err(format!("{} needs type parameters", wire_type)),
            (_, Some(_)) => return Err(format!("parameters do not fit {}", wire_type)),
        };
        Ok(ty)
    }

    /// Rendered type name, e.g. `list<i64>` or `map<string, Node>`.
    pub fn type_name(&self) -> String {
        match self {
            Self::String { binary: true } => "binary".to_string(),
            Self::Struct(target) | Self::Union { target, .. } => target.name().to_string(),
            Self::List(element) | Self::Set(element) => {
                format!("{}<{}>", self.kind(), element.ty.type_name())
            }
            Self::Map { key, value } => format!(
                "{}<{}, {}>",
                self.kind(),
                key.ty.type_name(),
                value.ty.type_name()
            ),
            _ => self.kind().name().to_string(),
        }
    }

    /// Check that `value` structurally matches this type.
    ///
    /// Containers are checked element by element; struct values must be
    /// instances of the referenced type.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::I64, Value::I64(_))
            | (Self::Double, Value::Double(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::String { binary: false } | Self::Utf8, Value::String(_))
            | (Self::String { binary: true }, Value::Binary(_)) => Ok(()),
            (Self::List(element), Value::List(items)) | (Self::Set(element), Value::Set(items)) => {
                items.iter().enumerate().try_for_each(|(index, item)| {
                    element
                        .ty
                        .check(item)
                        .map_err(|reason| format!("element {}: {}", index, reason))
                })
            }
            (Self::Map { key, value: val }, Value::Map(pairs)) => {
                pairs.iter().try_for_each(|(k, v)| {
                    key.ty
                        .check(k)
                        .map_err(|reason| format!("map key: {}", reason))?;
                    val.ty
                        .check(v)
                        .map_err(|reason| format!("map value: {}", reason))
                })
            }
            (Self::Struct(target) | Self::Union { target, .. }, Value::Struct(model)) => {
                if model.type_name() == target.name() {
                    Ok(())
                } else {
                    Err(format!(
                        "expected {}, got {}",
                        target.name(),
                        model.type_name()
                    ))
                }
            }
            _ => Err(format!(
                "expected {}, got {}",
                self.type_name(),
                value.kind_name()
            )),
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_equals(other)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::validators::Range;

    #[test]
    fn test_from_wire_rebuilds_nested_types() {
        let original = TypeDescriptor::map(
            TypeDescriptor::Utf8,
            TypeDescriptor::list(TypeDescriptor::set(TypeDescriptor::struct_ref("Node"))),
        );
        let spec = original.to_wire();
        let rebuilt =
            TypeDescriptor::from_wire(spec.type_id, spec.params.as_ref()).expect("from wire");
        assert!(rebuilt.type_equals(&original));
        assert_eq!(rebuilt.type_name(), "map<utf8, list<set<Node>>>");
        assert_eq!(rebuilt.to_wire(), spec);
    }

    #[test]
    fn test_from_wire_keeps_only_the_wire_form() {
        let binary = TypeDescriptor::binary().to_wire();
        let rebuilt = TypeDescriptor::from_wire(binary.type_id, binary.params.as_ref());
        assert_eq!(rebuilt.expect("string").type_name(), "string");

        let union = TypeDescriptor::union("Choice").to_wire();
        let rebuilt = TypeDescriptor::from_wire(union.type_id, union.params.as_ref());
        match rebuilt {
            Ok(TypeDescriptor::Struct(target)) => assert_eq!(target.name(), "Choice"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_wire_rejects_malformed_specs() {
        let element = WireParams::Element {
            type_id: 10,
            params: None,
        };
        assert!(TypeDescriptor::from_wire(15, None).is_err());
        assert!(TypeDescriptor::from_wire(10, Some(&element)).is_err());
        assert!(TypeDescriptor::from_wire(13, Some(&element)).is_err());
        assert!(TypeDescriptor::from_wire(8, None).is_err());
        assert!(TypeDescriptor::from_wire(99, None).is_err());
        let nested_bad = WireParams::Element {
            type_id: 12,
            params: None,
        };
        assert!(TypeDescriptor::from_wire(14, Some(&nested_bad)).is_err());
    }

    #[test]
    fn test_scalar_to_wire_has_no_params() {
        let spec = TypeDescriptor::I64.to_wire();
        assert_eq!(spec.type_id, 10);
        assert_eq!(spec.params, None);
    }

    #[test]
    fn test_map_to_wire_encodes_both_sides() {
        let ty =
            TypeDescriptor::map(TypeDescriptor::Utf8, TypeDescriptor::list(TypeDescriptor::I64));
        let spec = ty.to_wire();
        assert_eq!(spec.type_id, 13);
        assert_eq!(
            spec.params,
            Some(WireParams::Map {
                key_type_id: 16,
                key_params: None,
                value_type_id: 15,
                value_params: Some(Box::new(WireParams::Element {
                    type_id: 10,
                    params: None
                })),
            })
        );
    }

    #[test]
    fn test_struct_to_wire_references_target() {
        let spec = TypeDescriptor::struct_ref("Node").to_wire();
        assert_eq!(spec.type_id, 12);
        assert_eq!(
            spec.params,
            Some(WireParams::Struct {
                name: Arc::from("Node")
            })
        );
    }

    #[test]
    fn test_type_equals_is_structural() {
        let counts = || TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::I64);
        let a = TypeDescriptor::list(counts());
        let b = TypeDescriptor::list(counts());
        let c = TypeDescriptor::list(TypeDescriptor::map(
            TypeDescriptor::string(),
            TypeDescriptor::Double,
        ));
        assert!(a.type_equals(&b));
        assert!(!a.type_equals(&c));
        let list = TypeDescriptor::list(TypeDescriptor::I64);
        assert!(!list.type_equals(&TypeDescriptor::set(TypeDescriptor::I64)));
        assert!(!TypeDescriptor::string().type_equals(&TypeDescriptor::binary()));
        assert!(!TypeDescriptor::union("U").type_equals(&TypeDescriptor::unboxed_union("U")));
    }

    #[test]
    fn test_type_equals_ignores_validators() {
        let plain = TypeDescriptor::list(TypeDescriptor::I64);
        let checked = TypeDescriptor::list(
            ElementDescriptor::new(TypeDescriptor::I64).validator(Range::new(0, 10)),
        );
        assert_eq!(plain, checked);
    }

    #[test]
    fn test_type_name_rendering() {
        assert_eq!(TypeDescriptor::I64.type_name(), "i64");
        assert_eq!(TypeDescriptor::binary().type_name(), "binary");
        assert_eq!(
            TypeDescriptor::map(TypeDescriptor::string(), TypeDescriptor::struct_ref("Node"))
                .type_name(),
            "map<string, Node>"
        );
        assert_eq!(TypeDescriptor::set(TypeDescriptor::Utf8).type_name(), "set<utf8>");
    }

    #[test]
    fn test_check_reports_nested_mismatch() {
        let ty = TypeDescriptor::list(TypeDescriptor::I64);
        assert!(ty.check(&Value::List(vec![Value::I64(1), Value::I64(2)])).is_ok());
        let err = ty
            .check(&Value::List(vec![Value::I64(1), Value::from("two")]))
            .expect_err("string element must be rejected");
        assert!(err.contains("element 1"), "{}", err);
        assert!(TypeDescriptor::binary().check(&Value::from("text")).is_err());
        assert!(TypeDescriptor::binary().check(&Value::Binary(vec![1, 2])).is_ok());
    }
}
