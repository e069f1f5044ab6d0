// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response-data merging (§4.J): folds an action's `response_data` back into
//! the scenario's running state after each step, and pulls the accumulated
//! `_cache` back out once a scenario finishes.

use indexmap::IndexMap;
use scenario_core::Value;

/// Merges `response_data` from a step's envelope into `data`:
/// - `_async_action` is carried straight through under the same key.
/// - `_response_key`, read from the step's `params` (not the response
///   itself), renames the single response field the action's output schema
///   marks `replaceable` — everything else still merges flat. A
///   `_response_key` with no known replaceable field for this action is
///   ignored, since the action may simply not support substitution.
/// - everything else lands in `data._cache`, or `data._cache[namespace]` when
///   the step's params set `_namespace`.
pub fn merge_response_data(
    data: &Value,
    response_data: &IndexMap<String, Value>,
    params: &Value,
    replaceable_field: Option<&str>,
) -> Value {
    let mut response = response_data.clone();
    let async_action = response.shift_remove("_async_action");

    let response_key = params.as_map().and_then(|m| m.get("_response_key")).and_then(Value::as_str);
    if let (Some(key), Some(field)) = (response_key, replaceable_field) {
        match response.shift_remove(field) {
            Some(value) => {
                response.insert(key.to_string(), value);
            }
            None => tracing::warn!(field, response_key = key, "replaceable field missing from response_data"),
        }
    }

    let namespace = params.as_map().and_then(|m| m.get("_namespace")).and_then(Value::as_str);

    let cache_overlay = match namespace {
        Some(ns) => {
            let mut inner = IndexMap::new();
            inner.insert(ns.to_string(), Value::Map(response));
            inner
        }
        None => response,
    };

    let mut overlay = IndexMap::new();
    overlay.insert("_cache".to_string(), Value::Map(cache_overlay));
    if let Some(async_action) = async_action {
        overlay.insert("_async_action".to_string(), async_action);
    }

    data.deep_merge(&Value::Map(overlay))
}

/// Pulls the accumulated cache back out of `data` for the executor's final
/// `(result, cache)` return — an empty map if nothing was ever cached.
pub fn extract_cache(data: &Value) -> Value {
    data.as_map().and_then(|m| m.get("_cache")).cloned().unwrap_or_else(Value::map)
}
