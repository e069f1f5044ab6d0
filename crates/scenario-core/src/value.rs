// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic value tree shared by events, `_cache`, step params and scenario data.
//!
//! Mirrors the `map | list | string | number | bool | null` shape the engine
//! passes around end to end (events, cached responses, placeholder inputs).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON-like number that remembers whether it was produced as an integer
/// or a float, so arithmetic modifiers can "preserve integer when the result
/// is whole" rather than always promoting to a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Builds a `Number` from a float, collapsing to `Int` when the value is
    /// exactly whole (ArithmeticModifiers.modifier_divide etc. do this).
    pub fn from_f64_preserving(f: f64) -> Number {
        if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
            Number::Int(f as i64)
        } else {
            Number::Float(f)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    pub fn map() -> Value {
        Value::Map(IndexMap::new())
    }

    pub fn int(i: i64) -> Value {
        Value::Number(Number::Int(i))
    }

    pub fn float(f: f64) -> Value {
        Value::Number(Number::Float(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `is_null` modifier / operator semantics: null, empty string, or the
    /// case-insensitive literal string `"null"`.
    pub fn is_null_like(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty() || s.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }

    /// `fallback` only triggers on null or empty string; `false`/`0`/`[]`/`{}`
    /// are valid values and must not be replaced.
    pub fn is_null_or_empty_string(&self) -> bool {
        matches!(self, Value::Null) || matches!(self, Value::String(s) if s.is_empty())
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(Number::Int(i)) => Some(*i),
            Value::Number(Number::Float(f)) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// Python-style truthiness used by `modifier_true` and boolean coercions.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(l) => !l.is_empty(),
            Value::Map(m) => !m.is_empty(),
        }
    }

    /// Stringifies the way `str(value)` does in the original, for modifiers
    /// that fall back to string representation.
    pub fn stringify(&self) -> String {
        match self {
            Value::Null => "None".to_string(),
            Value::Bool(b) => {
                if *b {
                    "True".to_string()
                } else {
                    "False".to_string()
                }
            }
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::List(_) | Value::Map(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Deep-merge: recursively merges maps, `other` overriding leaf scalars
    /// and lists. Grounded in `object_utils.deep_merge`.
    pub fn deep_merge(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Map(base), Value::Map(overlay)) => {
                let mut result = base.clone();
                for (key, value) in overlay {
                    match result.get(key) {
                        Some(existing @ Value::Map(_)) if matches!(value, Value::Map(_)) => {
                            result.insert(key.clone(), existing.deep_merge(value));
                        }
                        _ => {
                            result.insert(key.clone(), value.clone());
                        }
                    }
                }
                Value::Map(result)
            }
            (_, other) => other.clone(),
        }
    }
}

#[path = "value_tests.rs"]
#[cfg(test)]
mod value_tests;
