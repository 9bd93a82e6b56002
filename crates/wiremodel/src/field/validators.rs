// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field value validators.
//!
//! Validators see the stored value or `None` when the field is unset. The
//! built-in validators other than [`NotNull`] accept unset values; combine
//! them with [`NotNull`] (or mark the field required) to reject absence.

use crate::types::Value;
use std::fmt;

/// Value predicate attached to a field or container element.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Accept the value or describe why it is rejected.
    fn validate(&self, value: Option<&Value>) -> Result<(), String>;
}

/// Rejects unset values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

impl Validator for NotNull {
    fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        match value {
            Some(_) => Ok(()),
            None => Err("value is not set".to_string()),
        }
    }
}

/// Inclusive numeric range for `i64` and `double` values.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    min: i64,
    max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Validator for Range {
    #[allow(clippy::cast_precision_loss)] // bounds are compared as f64 for double values
    fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        let in_range = match value {
            None => return Ok(()),
            Some(Value::I64(v)) => (self.min..=self.max).contains(v),
            Some(Value::Double(v)) => *v >= self.min as f64 && *v <= self.max as f64,
            Some(other) => {
                return Err(format!("range check needs a number, got {}", other.kind_name()))
            }
        };
        if in_range {
            Ok(())
        } else {
            Err(format!(
                "{} is outside [{}, {}]",
                value.map_or_else(String::new, ToString::to_string),
                self.min,
                self.max
            ))
        }
    }
}

/// Length bounds for strings, byte strings and containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
}

impl Length {
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

impl Validator for Length {
    fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        let Some(value) = value else {
            return Ok(());
        };
        let len = value
            .len()
            .ok_or_else(|| format!("length check does not apply to {}", value.kind_name()))?;
        if let Some(min) = self.min {
            if len < min {
                return Err(format!("length {} is below minimum {}", len, min));
            }
        }
        if let Some(max) = self.max {
            if len > max {
                return Err(format!("length {} exceeds maximum {}", len, max));
            }
        }
        Ok(())
    }
}

/// Accepts only the listed values.
#[derive(Debug, Clone)]
pub struct OneOf(pub Vec<Value>);

impl Validator for OneOf {
    fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        match value {
            None => Ok(()),
            Some(v) if self.0.contains(v) => Ok(()),
            Some(v) => Err(format!("{} is not an allowed value", v)),
        }
    }
}

/// Named predicate over set values.
pub struct Predicate {
    description: String,
    check: Box<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new(
        description: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            check: Box::new(check),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Validator for Predicate {
    fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        match value {
            Some(v) if !(self.check)(v) => Err(format!("{} failed for {}", self.description, v)),
            _ => Ok(()),
        }
    }
}
