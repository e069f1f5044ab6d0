// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! List-shaping modifiers (§4.D). Non-list input is treated as a
//! single-element list the way the original coerces `str(value)` before
//! applying most of these.

use scenario_core::Value;

fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// `join:, ` — stringifies and concatenates with the given separator
/// (default `,`).
pub fn join(value: &Value, param: Option<&str>) -> Value {
    let separator = param.unwrap_or(",");
    let joined = as_list(value).iter().map(Value::stringify).collect::<Vec<_>>().join(separator);
    Value::String(joined)
}

pub fn first(value: &Value, _param: Option<&str>) -> Value {
    as_list(value).into_iter().next().unwrap_or(Value::Null)
}

pub fn last(value: &Value, _param: Option<&str>) -> Value {
    as_list(value).into_iter().next_back().unwrap_or(Value::Null)
}

pub fn reverse(value: &Value, _param: Option<&str>) -> Value {
    let mut items = as_list(value);
    items.reverse();
    Value::List(items)
}

/// Sorts by string representation — the original has no concept of a
/// typed list, so every comparison goes through `str(value)`.
pub fn sort(value: &Value, _param: Option<&str>) -> Value {
    let mut items = as_list(value);
    items.sort_by_key(Value::stringify);
    Value::List(items)
}

pub fn unique(value: &Value, _param: Option<&str>) -> Value {
    let mut seen = std::collections::HashSet::new();
    let items = as_list(value)
        .into_iter()
        .filter(|item| seen.insert(item.stringify()))
        .collect();
    Value::List(items)
}

/// `expand` is a marker modifier: it leaves the value untouched here, and
/// the placeholder processor checks for its presence on the raw modifier
/// chain text to decide whether a list-of-lists result should be flattened
/// one level into the surrounding array.
pub fn expand(value: &Value, _param: Option<&str>) -> Value {
    value.clone()
}

/// `keys` — a map's keys as a list; `null` on `null` input, empty list for
/// anything else that isn't a map.
pub fn keys(value: &Value, _param: Option<&str>) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Map(m) => Value::List(m.keys().map(|k| Value::String(k.clone())).collect()),
        _ => Value::List(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[i64]) -> Value {
        Value::List(items.iter().map(|i| Value::int(*i)).collect())
    }

    #[test]
    fn join_uses_given_separator() {
        assert_eq!(join(&list(&[1, 2, 3]), Some(" | ")), Value::String("1 | 2 | 3".into()));
    }

    #[test]
    fn first_and_last_on_empty_list_are_null() {
        assert_eq!(first(&Value::List(vec![]), None), Value::Null);
        assert_eq!(last(&Value::List(vec![]), None), Value::Null);
    }

    #[test]
    fn unique_preserves_first_occurrence_order() {
        assert_eq!(unique(&list(&[1, 2, 1, 3, 2]), None), list(&[1, 2, 3]));
    }

    #[test]
    fn non_list_value_is_treated_as_single_element() {
        assert_eq!(first(&Value::int(5), None), Value::int(5));
    }

    #[test]
    fn keys_lists_a_maps_keys_in_order() {
        let mut map = indexmap::IndexMap::new();
        map.insert("b".to_string(), Value::int(1));
        map.insert("a".to_string(), Value::int(2));
        assert_eq!(keys(&Value::Map(map), None), Value::List(vec![Value::String("b".into()), Value::String("a".into())]));
    }

    #[test]
    fn keys_on_null_is_null_and_on_scalar_is_empty_list() {
        assert_eq!(keys(&Value::Null, None), Value::Null);
        assert_eq!(keys(&Value::int(5), None), Value::List(vec![]));
    }
}
