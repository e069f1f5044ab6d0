// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conditional/boolean modifiers (§4.D). Grounded in
//! `modifiers_conditional.py`.

use scenario_core::Value;

pub fn equals(value: &Value, param: Option<&str>) -> Value {
    let param = param.unwrap_or_default();
    Value::Bool(value.stringify() == param)
}

/// `in_list:a,b,c` — comma-split, whitespace-trimmed membership test. An
/// empty/missing param is never a member of anything.
pub fn in_list(value: &Value, param: Option<&str>) -> Value {
    let Some(param) = param.filter(|p| !p.is_empty()) else {
        return Value::Bool(false);
    };
    let needle = value.stringify();
    let is_member = param.split(',').map(str::trim).any(|item| item == needle);
    Value::Bool(is_member)
}

/// Python-style truthiness with a case-insensitive `"true"`/`"false"` string
/// special case before falling back to [`Value::truthy`].
pub fn is_true(value: &Value, _param: Option<&str>) -> Value {
    let truthy = match value {
        Value::String(s) if s.eq_ignore_ascii_case("true") => true,
        Value::String(s) if s.eq_ignore_ascii_case("false") => false,
        Value::String(s) => !s.trim().is_empty(),
        other => other.truthy(),
    };
    Value::Bool(truthy)
}

/// `value:X` returns `X` when the field is truthy, else an empty string —
/// used to gate a literal on another field's presence.
pub fn value_if_truthy(value: &Value, param: Option<&str>) -> Value {
    if value.truthy() {
        Value::String(param.unwrap_or_default().to_string())
    } else {
        Value::String(String::new())
    }
}

pub fn exists(value: &Value, _param: Option<&str>) -> Value {
    let exists = !matches!(value, Value::Null) && !matches!(value, Value::String(s) if s.is_empty());
    Value::Bool(exists)
}

pub fn is_null(value: &Value, _param: Option<&str>) -> Value {
    Value::Bool(value.is_null_like())
}
