// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn values() -> Value {
    serde_json::from_str(
        r#"{"user": {"name": "Ada", "age": 30, "bio": "Ada Lovelace Programmer"}, "tags": ["a", "b"], "nested": ["1", "2"]}"#,
    )
    .unwrap()
}

fn processor() -> PlaceholderProcessor {
    PlaceholderProcessor::new(10)
}

#[test]
fn whole_string_placeholder_preserves_type() {
    let result = processor().process_text("{user.age}", &values());
    assert_eq!(result, "30");
    // Value-preserving variant (used by process(), not process_text()):
    let typed = processor().process(&Value::String("{user.age}".into()), &values());
    assert_eq!(typed, Value::int(30));
}

#[test]
fn embedded_placeholder_is_always_stringified() {
    let result = processor().process_text("Hello, {user.name}!", &values());
    assert_eq!(result, "Hello, Ada!");
}

#[test]
fn unresolved_placeholder_is_left_verbatim() {
    let result = processor().process_text("{missing.field}", &values());
    assert_eq!(result, "{missing.field}");
}

#[test]
fn fallback_modifier_supplies_value_for_missing_field() {
    let result = processor().process_text("{missing.field|fallback:unknown}", &values());
    assert_eq!(result, "unknown");
}

#[test]
fn modifier_chain_applies_left_to_right() {
    let result = processor().process_text("{user.bio|upper|truncate:10}", &values());
    assert_eq!(result, "ADA LOV...");
}

#[test]
fn arithmetic_modifier_on_numeric_field() {
    let result = processor().process(&Value::String("{user.age|+5}".into()), &values());
    assert_eq!(result, Value::int(35));
}

#[test]
fn literal_string_bypasses_field_lookup() {
    let result = processor().process_text(r#"{"/help"}"#, &values());
    assert_eq!(result, "/help");
}

#[test]
fn map_tree_is_processed_recursively() {
    let data: Value = serde_json::from_str(r#"{"greeting": "Hi {user.name}", "count": 1}"#).unwrap();
    let result = processor().process(&data, &values());
    assert_eq!(
        result,
        serde_json::from_str::<Value>(r#"{"greeting": "Hi Ada", "count": 1}"#).unwrap()
    );
}

#[test]
fn list_item_resolving_to_a_list_is_flattened_one_level() {
    let data: Value = serde_json::from_str(r#"["{tags}", "fixed"]"#).unwrap();
    let result = processor().process(&data, &values());
    assert_eq!(
        result,
        Value::List(vec![
            Value::String("a".into()),
            Value::String("b".into()),
            Value::String("fixed".into()),
        ])
    );
}

#[test]
fn process_full_deep_merges_unprocessed_fields_back_in() {
    let data: Value =
        serde_json::from_str(r#"{"a": {"greeting": "Hi {user.name}"}, "b": "untouched"}"#).unwrap();
    let result = processor().process_full(&data, &values());
    assert_eq!(
        result,
        serde_json::from_str::<Value>(r#"{"a": {"greeting": "Hi Ada"}, "b": "untouched"}"#).unwrap()
    );
}
