// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Convenience accessors over a resolved `_async_action` entry (§4.H/§4.D):
//! `{$_async_action.notify_id|await_status}` reads the handle's `status`
//! field once the field path has already resolved to that entry's map.

use scenario_core::Value;

fn field(value: &Value, key: &str) -> Value {
    value.as_map().and_then(|m| m.get(key)).cloned().unwrap_or(Value::Null)
}

pub fn await_status(value: &Value, _param: Option<&str>) -> Value {
    field(value, "status")
}

pub fn await_result(value: &Value, _param: Option<&str>) -> Value {
    field(value, "result")
}

/// `ready` / `not_ready` — inspects an `_async_action` handle's `status`
/// field; a value that isn't a recognizable handle (no `status` field) is
/// neither ready nor not-ready and both report `false`, matching how the
/// original treats anything that isn't an awaitable.
pub fn ready(value: &Value, _param: Option<&str>) -> Value {
    match field(value, "status") {
        Value::Null => Value::Bool(false),
        status => Value::Bool(status != Value::String("pending".to_string())),
    }
}

pub fn not_ready(value: &Value, _param: Option<&str>) -> Value {
    match field(value, "status") {
        Value::Null => Value::Bool(false),
        status => Value::Bool(status == Value::String("pending".to_string())),
    }
}
