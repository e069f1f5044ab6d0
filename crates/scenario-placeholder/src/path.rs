// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dotted/bracketed field-path resolution for placeholder substitution
//! (§4.D). Richer than the condition evaluator's [`FieldPath`]-style
//! resolver: bracket segments may hold either an integer list index or a
//! quoted/bare string map key (`$items[0].name`, `$headers["content-type"]`),
//! and missing data is distinguished from data that resolves to an explicit
//! `null` — a placeholder whose field genuinely isn't present is left
//! unresolved (kept verbatim in the output) rather than rendered as `None`.

use scenario_core::Value;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Name(String),
    Index(i64),
}

fn parse(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for raw_part in path.split('.') {
        if raw_part.is_empty() {
            continue;
        }
        let name_end = raw_part.find('[').unwrap_or(raw_part.len());
        let name = &raw_part[..name_end];
        if !name.is_empty() {
            segments.push(Segment::Name(name.to_string()));
        }

        let mut rest = &raw_part[name_end..];
        while let Some(open) = rest.find('[') {
            let Some(close) = rest[open..].find(']') else { break };
            let inner = rest[open + 1..open + close].trim();
            if let Ok(idx) = inner.parse::<i64>() {
                segments.push(Segment::Index(idx));
            } else {
                segments.push(Segment::Name(unquote(inner).to_string()));
            }
            rest = &rest[open + close + 1..];
        }
    }
    segments
}

fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn index_list(list: &[Value], idx: i64) -> Option<Value> {
    let len = list.len() as i64;
    let resolved = if idx < 0 { len + idx } else { idx };
    if resolved < 0 || resolved >= len {
        None
    } else {
        Some(list[resolved as usize].clone())
    }
}

/// Resolves a `$`-prefixed or bare dotted path against a value tree.
/// Returns `None` when any segment along the way is missing or the wrong
/// shape for its segment kind (e.g. indexing into a map) — callers use this
/// to tell "absent" apart from a present `null`.
pub fn get_nested_value(root: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix('$').unwrap_or(path);
    let mut current = root.clone();
    for segment in parse(path) {
        current = match (&segment, &current) {
            (Segment::Name(name), Value::Map(m)) => m.get(name)?.clone(),
            (Segment::Index(i), Value::List(l)) => index_list(l, *i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// A field reference that is itself a quoted literal (`"/help"`, `'ok'`) is
/// taken as a literal string instead of a path lookup — the placeholder
/// chain's `{"/help"}` escape hatch for literal text.
pub fn extract_literal_or_get_value(field: &str, values: &Value) -> Option<Value> {
    let trimmed = field.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return Some(Value::String(trimmed[1..trimmed.len() - 1].to_string()));
        }
    }
    get_nested_value(values, trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> Value {
        serde_json::from_str(
            r#"{"user": {"name": "Ada"}, "items": [10, 20], "headers": {"content-type": "json"}, "flag": null}"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_dotted_map_path() {
        assert_eq!(get_nested_value(&values(), "$user.name"), Some(Value::String("Ada".into())));
    }

    #[test]
    fn resolves_numeric_array_index() {
        assert_eq!(get_nested_value(&values(), "items[1]"), Some(Value::int(20)));
    }

    #[test]
    fn resolves_quoted_bracket_key() {
        assert_eq!(
            get_nested_value(&values(), "headers[\"content-type\"]"),
            Some(Value::String("json".into()))
        );
    }

    #[test]
    fn missing_field_resolves_to_none_not_null() {
        assert_eq!(get_nested_value(&values(), "missing"), None);
    }

    #[test]
    fn present_null_resolves_to_some_null() {
        assert_eq!(get_nested_value(&values(), "flag"), Some(Value::Null));
    }

    #[test]
    fn literal_double_quoted_string_bypasses_lookup() {
        assert_eq!(
            extract_literal_or_get_value("\"/help\"", &values()),
            Some(Value::String("/help".into()))
        );
    }
}
