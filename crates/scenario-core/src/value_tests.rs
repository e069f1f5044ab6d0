// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn deep_merge_overrides_leaf_scalars() {
    let base = Value::Map(IndexMap::from([
        ("a".to_string(), Value::int(1)),
        ("b".to_string(), Value::int(2)),
    ]));
    let overlay = Value::Map(IndexMap::from([("b".to_string(), Value::int(99))]));
    let merged = base.deep_merge(&overlay);
    assert_eq!(merged.as_map().unwrap().get("a"), Some(&Value::int(1)));
    assert_eq!(merged.as_map().unwrap().get("b"), Some(&Value::int(99)));
}

#[test]
fn deep_merge_recurses_into_nested_maps() {
    let base = Value::Map(IndexMap::from([(
        "nested".to_string(),
        Value::Map(IndexMap::from([("x".to_string(), Value::int(1))])),
    )]));
    let overlay = Value::Map(IndexMap::from([(
        "nested".to_string(),
        Value::Map(IndexMap::from([("y".to_string(), Value::int(2))])),
    )]));
    let merged = base.deep_merge(&overlay);
    let nested = merged.as_map().unwrap().get("nested").unwrap().as_map().unwrap();
    assert_eq!(nested.get("x"), Some(&Value::int(1)));
    assert_eq!(nested.get("y"), Some(&Value::int(2)));
}

#[test]
fn deep_merge_is_idempotent() {
    let x = Value::Map(IndexMap::from([
        ("a".to_string(), Value::int(1)),
        (
            "nested".to_string(),
            Value::Map(IndexMap::from([("b".to_string(), Value::String("x".into()))])),
        ),
    ]));
    assert_eq!(x.deep_merge(&x), x);
}

#[parameterized(
    null = { Value::Null, true },
    empty_string = { Value::String(String::new()), true },
    literal_null = { Value::String("null".into()), true },
    literal_null_upper = { Value::String("NULL".into()), true },
    zero = { Value::int(0), false },
    false_bool = { Value::Bool(false), false },
    empty_list = { Value::List(vec![]), false },
)]
fn is_null_like_matches_original_rules(value: Value, expected: bool) {
    assert_eq!(value.is_null_like(), expected);
}

#[parameterized(
    null = { Value::Null, true },
    empty_string = { Value::String(String::new()), true },
    false_bool = { Value::Bool(false), false },
    zero = { Value::int(0), false },
    empty_list = { Value::List(vec![]), false },
    empty_map = { Value::Map(IndexMap::new()), false },
)]
fn fallback_trigger_rules(value: Value, expected: bool) {
    assert_eq!(value.is_null_or_empty_string(), expected);
}

#[test]
fn number_preserves_integer_when_whole() {
    assert_eq!(Number::from_f64_preserving(4.0), Number::Int(4));
    assert_eq!(Number::from_f64_preserving(4.5), Number::Float(4.5));
}
