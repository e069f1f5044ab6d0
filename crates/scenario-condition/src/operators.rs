// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Predicate operator semantics (§4.B). Grounded in
//! `condition_parser/core/operators.py`: every function here is total and
//! never panics — a malformed comparison simply evaluates to `false`.

use regex::Regex;
use scenario_core::Value;

fn try_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `None` compares by identity; otherwise numeric coercion is attempted
/// before falling back to same-type structural equality.
pub fn safe_eq(left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return left.is_null() && right.is_null();
    }
    if let (Some(l), Some(r)) = (try_as_number(left), try_as_number(right)) {
        return l == r;
    }
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::List(a), Value::List(b)) => a == b,
        (Value::Map(a), Value::Map(b)) => a == b,
        _ => left.stringify() == right.stringify(),
    }
}

pub fn safe_ne(left: &Value, right: &Value) -> bool {
    !safe_eq(left, right)
}

fn ordering(left: &Value, right: &Value) -> Option<std::cmp::Ordering> {
    let l = try_as_number(left)?;
    let r = try_as_number(right)?;
    l.partial_cmp(&r)
}

pub fn safe_gt(left: &Value, right: &Value) -> bool {
    ordering(left, right) == Some(std::cmp::Ordering::Greater)
}

pub fn safe_lt(left: &Value, right: &Value) -> bool {
    ordering(left, right) == Some(std::cmp::Ordering::Less)
}

pub fn safe_gte(left: &Value, right: &Value) -> bool {
    matches!(
        ordering(left, right),
        Some(std::cmp::Ordering::Greater) | Some(std::cmp::Ordering::Equal)
    )
}

pub fn safe_lte(left: &Value, right: &Value) -> bool {
    matches!(
        ordering(left, right),
        Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal)
    )
}

/// Substring containment (`~`) on the string form of the left operand.
pub fn contains(left: &Value, right: &Value) -> bool {
    left.stringify().contains(&right.stringify())
}

/// `regex` operator: a compile failure or a null value evaluates to `false`,
/// never an error.
pub fn regex_match(value: &Value, pattern: &str) -> bool {
    if value.is_null() {
        return false;
    }
    match Regex::new(pattern) {
        Ok(re) => re.is_match(&value.stringify()),
        Err(_) => false,
    }
}

pub fn is_null(value: &Value) -> bool {
    value.is_null_like()
}

pub fn not_is_null(value: &Value) -> bool {
    !is_null(value)
}
