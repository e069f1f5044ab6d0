// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! String-shaping modifiers (§4.D). Grounded in `modifiers_basic.py`: every
//! function here degrades to the value's string form on bad input rather
//! than failing the whole placeholder chain.

use regex::Regex;
use scenario_core::Value;

fn stringify_or_empty(value: &Value) -> String {
    if value.is_null() {
        String::new()
    } else {
        value.stringify()
    }
}

pub fn upper(value: &Value, _param: Option<&str>) -> Value {
    Value::String(stringify_or_empty(value).to_uppercase())
}

pub fn lower(value: &Value, _param: Option<&str>) -> Value {
    Value::String(stringify_or_empty(value).to_lowercase())
}

pub fn title(value: &Value, _param: Option<&str>) -> Value {
    Value::String(title_case(&stringify_or_empty(value)))
}

pub fn capitalize(value: &Value, _param: Option<&str>) -> Value {
    let s = stringify_or_empty(value);
    let mut chars = s.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str(),
        None => String::new(),
    };
    Value::String(capitalized)
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `truncate:N` cuts to `N - 3` characters and appends `...` when the string
/// is longer than `N`; an absent/non-numeric param returns the string as-is.
pub fn truncate(value: &Value, param: Option<&str>) -> Value {
    let s = stringify_or_empty(value);
    let Some(length) = param.and_then(|p| p.trim().parse::<usize>().ok()).filter(|n| *n > 0) else {
        return Value::String(s);
    };
    if s.chars().count() <= length {
        return Value::String(s);
    }
    let keep = length.saturating_sub(3);
    let truncated: String = s.chars().take(keep).collect();
    Value::String(format!("{truncated}..."))
}

pub fn length(value: &Value, _param: Option<&str>) -> Value {
    let len = match value {
        Value::Null => 0,
        Value::List(l) => l.len(),
        Value::Map(m) => m.len(),
        other => other.stringify().chars().count(),
    };
    Value::int(len as i64)
}

/// `case:upper|lower|title|capitalize` dispatches to the matching modifier;
/// an unrecognised or absent param passes the value through unchanged.
pub fn case(value: &Value, param: Option<&str>) -> Value {
    match param.map(str::trim) {
        Some("upper") => upper(value, None),
        Some("lower") => lower(value, None),
        Some("title") => title(value, None),
        Some("capitalize") => capitalize(value, None),
        _ => value.clone(),
    }
}

/// `regex:<pattern>` returns the first capture group if the pattern has one,
/// else the whole match; no match returns an empty string; a bad pattern or
/// missing param returns the original string form.
pub fn regex(value: &Value, param: Option<&str>) -> Value {
    let Some(pattern) = param.filter(|p| !p.is_empty()) else {
        return Value::String(stringify_or_empty(value));
    };
    let s = stringify_or_empty(value);
    match Regex::new(pattern) {
        Ok(re) => match re.captures(&s) {
            Some(caps) => {
                let matched = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str()).unwrap_or("");
                Value::String(matched.to_string())
            }
            None => Value::String(String::new()),
        },
        Err(_) => Value::String(s),
    }
}

/// `code` wraps the value (or each item of a list, newline-joined) in an
/// HTML `<code>` tag — a chat-formatting convenience.
pub fn code(value: &Value, _param: Option<&str>) -> Value {
    match value {
        Value::Null => Value::String("<code></code>".to_string()),
        Value::List(items) => {
            let joined = items
                .iter()
                .map(|item| format!("<code>{}</code>", item.stringify()))
                .collect::<Vec<_>>()
                .join("\n");
            Value::String(joined)
        }
        other => Value::String(format!("<code>{}</code>", other.stringify())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_ellipsis_when_over_length() {
        assert_eq!(truncate(&Value::String("hello world".into()), Some("8")), Value::String("hello...".into()));
    }

    #[test]
    fn truncate_passes_through_short_strings() {
        assert_eq!(truncate(&Value::String("hi".into()), Some("8")), Value::String("hi".into()));
    }

    #[test]
    fn length_counts_list_items_not_characters() {
        assert_eq!(length(&Value::List(vec![Value::int(1), Value::int(2)]), None), Value::int(2));
    }

    #[test]
    fn regex_returns_first_capture_group() {
        let result = regex(&Value::String("order-42".into()), Some(r"order-(\d+)"));
        assert_eq!(result, Value::String("42".into()));
    }

    #[test]
    fn regex_no_match_returns_empty_string() {
        assert_eq!(regex(&Value::String("x".into()), Some(r"\d+")), Value::String(String::new()));
    }

    #[test]
    fn code_wraps_list_items_individually() {
        let result = code(&Value::List(vec![Value::int(1), Value::int(2)]), None);
        assert_eq!(result, Value::String("<code>1</code>\n<code>2</code>".into()));
    }
}
