// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result-type coercion for resolved placeholder text (§4.D).
//!
//! Once a placeholder's field value and modifier chain have all resolved to
//! a string, [`determine_result_type`] decides whether that string should be
//! handed back as a Rust `Value::String`, or promoted to a bool/number/list/
//! map — the same rule a whole-string-is-one-placeholder substitution uses
//! to preserve non-string types instead of stringifying everything.

use scenario_core::Value;

/// Coercion order: booleans and `null`/`none` literals first, then numeric
/// parsing, then a best-effort JSON array/object sniff, falling back to the
/// input string untouched.
///
/// The array/object sniff only looks at the first and last character
/// (`[...]` / `{...}`) — a string that merely starts with `[` without being
/// valid JSON falls through to a plain string rather than erroring.
pub fn determine_result_type(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if trimmed.eq_ignore_ascii_case("null") || trimmed.eq_ignore_ascii_case("none") {
        return Value::Null;
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::float(f);
    }

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return value;
        }
    }
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return value;
        }
    }

    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        bool_true = { "true", Value::Bool(true) },
        bool_false_mixed_case = { "False", Value::Bool(false) },
        null_literal = { "null", Value::Null },
        none_literal = { "None", Value::Null },
        integer = { "42", Value::int(42) },
        float = { "3.5", Value::float(3.5) },
        plain_string = { "hello", Value::String("hello".into()) },
    )]
    fn coerces_scalars(input: &str, expected: Value) {
        assert_eq!(determine_result_type(input), expected);
    }

    #[test]
    fn valid_json_array_is_promoted_to_a_list() {
        assert_eq!(
            determine_result_type("[1, 2, 3]"),
            Value::List(vec![Value::int(1), Value::int(2), Value::int(3)])
        );
    }

    #[test]
    fn bracketed_but_invalid_json_falls_back_to_string() {
        let raw = "[not json";
        assert_eq!(determine_result_type(raw), Value::String(raw.into()));
    }
}
