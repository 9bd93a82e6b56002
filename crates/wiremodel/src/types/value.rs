// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic field values.

use crate::model::Model;
use std::fmt;

/// A value stored in a model field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Scalars
    Bool(bool),
    I64(i64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),

    // Containers
    List(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value pairs in insertion order.
    Map(Vec<(Value, Value)>),

    // Nested struct or union instance
    Struct(Box<Model>),
}

impl Value {
    /// Short name of the value's variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Struct(_) => "struct",
        }
    }

    /// Build a list value.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set value. Duplicates (by equality) are dropped, first wins.
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Self::Set(unique)
    }

    /// Build a map value from key/value pairs.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            Self::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Elements of a list or set.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Struct(model) => Some(model),
            _ => None,
        }
    }

    /// Length of a string, byte string or container.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Binary(b) => Some(b.len()),
            Self::List(items) | Self::Set(items) => Some(items.len()),
            Self::Map(pairs) => Some(pairs.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Binary(b) => write!(f, "b{:02x?}", b),
            Self::List(items) => {
                f.write_str("[")?;
                join(f, items)?;
                f.write_str("]")
            }
            Self::Set(items) => {
                f.write_str("{")?;
                join(f, items)?;
                f.write_str("}")
            }
            Self::Map(pairs) => {
                f.write_str("{")?;
                for (index, (k, v)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Self::Struct(model) => write!(f, "{}", model),
        }
    }
}

/// Conversion out of a stored [`Value`].
pub trait FromValue: Sized {
    /// Convert, or return the expected type name on mismatch.
    fn from_value(value: &Value) -> Result<Self, &'static str>;
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, &'static str> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    _ => Err($name),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f64, Double, "double");
impl_from_value!(String, String, "string");
impl_from_value!(Vec<u8>, Binary, "binary");

impl FromValue for Model {
    fn from_value(value: &Value) -> Result<Self, &'static str> {
        match value {
            Value::Struct(model) => Ok(model.as_ref().clone()),
            _ => Err("struct"),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, &'static str> {
        Ok(value.clone())
    }
}

macro_rules! impl_into_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_into_value!(bool, Bool);
impl_into_value!(i64, I64);
impl_into_value!(f64, Double);
impl_into_value!(String, String);
impl_into_value!(Vec<u8>, Binary);

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl From<Model> for Value {
    fn from(model: Model) -> Self {
        Value::Struct(Box::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_drops_duplicates() {
        let set = Value::set([1i64, 2, 1, 3]);
        assert_eq!(set.as_slice().map(<[Value]>::len), Some(3));
    }

    #[test]
    fn test_display() {
        let value =
            Value::map([("a", Value::list([1i64, 2])), ("b", Value::list(Vec::<i64>::new()))]);
        assert_eq!(value.to_string(), "{\"a\": [1, 2], \"b\": []}");
        assert_eq!(Value::Binary(vec![0xab, 0x01]).to_string(), "b[ab, 01]");
    }

    #[test]
    fn test_from_value_mismatch_names_expected_type() {
        assert_eq!(i64::from_value(&Value::I64(4)), Ok(4));
        assert_eq!(i64::from_value(&Value::Bool(true)), Err("i64"));
        assert_eq!(String::from_value(&Value::from("x")), Ok("x".to_string()));
    }
}
