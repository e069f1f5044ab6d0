// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Modifier registry (§4.D): maps a modifier's name to its implementation.
//! Organized by category (arithmetic, conditional, datetime, ...) as small
//! free functions feeding one registry lookup, rather than stateful handler
//! objects per category.

pub mod arithmetic;
pub mod array;
pub mod async_actions;
pub mod basic;
pub mod conditional;
pub mod datetime;
pub mod formatting;

use scenario_core::Value;

pub type ModifierFn = fn(&Value, Option<&str>) -> Value;

/// Looks up a named modifier. Arithmetic modifiers are matched by the
/// processor before this is consulted (their "name" is a bare operator
/// symbol, handled separately — see [`crate::processor::is_arithmetic`]).
pub fn lookup(name: &str) -> Option<ModifierFn> {
    let f: ModifierFn = match name {
        "upper" => basic::upper,
        "lower" => basic::lower,
        "title" => basic::title,
        "capitalize" => basic::capitalize,
        "truncate" => basic::truncate,
        "length" => basic::length,
        "case" => basic::case,
        "regex" => basic::regex,
        "code" => basic::code,
        "equals" => conditional::equals,
        "in_list" => conditional::in_list,
        "true" => conditional::is_true,
        "value" => conditional::value_if_truthy,
        "exists" => conditional::exists,
        "is_null" => conditional::is_null,
        "shift" => datetime::shift,
        "timestamp" => datetime::timestamp,
        "seconds" => datetime::seconds,
        "to_second" => datetime::to_second,
        "to_minute" => datetime::to_minute,
        "to_hour" => datetime::to_hour,
        "to_date" => datetime::to_date,
        "to_week" => datetime::to_week,
        "to_month" => datetime::to_month,
        "to_year" => datetime::to_year,
        "join" => array::join,
        "first" => array::first,
        "last" => array::last,
        "reverse" => array::reverse,
        "sort" => array::sort,
        "unique" => array::unique,
        "expand" => array::expand,
        "keys" => array::keys,
        "format" => formatting::format_value,
        "tags" => formatting::tags,
        "list" => formatting::list,
        "comma" => formatting::comma,
        "await_status" => async_actions::await_status,
        "await_result" => async_actions::await_result,
        "ready" => async_actions::ready,
        "not_ready" => async_actions::not_ready,
        _ => return None,
    };
    Some(f)
}

/// `fallback:<literal>` only triggers on a null or empty-string value
/// (never on `false`/`0`/`[]`/`{}`); the fallback literal is itself passed
/// through [`crate::type_utils::determine_result_type`] so `fallback:5`
/// yields the integer `5`, not the string `"5"`.
pub fn fallback(value: &Value, param: Option<&str>) -> Value {
    if !value.is_null_or_empty_string() {
        return value.clone();
    }
    match param {
        Some(literal) => crate::type_utils::determine_result_type(literal.trim()),
        None => Value::Null,
    }
}
