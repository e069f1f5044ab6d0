// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display-formatting modifiers (§4.D). Grounded in `modifiers_formatting.py`:
//! every modifier degrades to the input's own string form on bad input
//! rather than failing the chain.

use super::datetime::parse_datetime_value;
use scenario_core::Value;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn stringify_or_empty(value: &Value) -> Value {
    if value.is_null() {
        Value::String(String::new())
    } else {
        Value::String(value.stringify())
    }
}

/// `format:type` (`timestamp`, `date`, `time`, `time_full`, `datetime`,
/// `datetime_full`, `pg_date`, `pg_datetime`, `currency`, `percent`,
/// `number`) — renders a parsed datetime or number in the requested shape,
/// falling back to the input's own string form when the type is unknown or
/// parsing fails. `0` is treated as a real value, not a falsy short-circuit.
pub fn format_value(value: &Value, param: Option<&str>) -> Value {
    let is_zero = matches!(value, Value::Number(n) if n.as_f64() == 0.0);
    let Some(kind) = param else {
        return stringify_or_empty(value);
    };
    if !value.truthy() && !is_zero {
        return stringify_or_empty(value);
    }

    let formatted = match kind {
        "timestamp" => parse_datetime_value(value).map(|dt| dt.and_utc().timestamp().to_string()),
        "date" => parse_datetime_value(value).map(|dt| dt.format("%d.%m.%Y").to_string()),
        "time" => parse_datetime_value(value).map(|dt| dt.format("%H:%M").to_string()),
        "time_full" => parse_datetime_value(value).map(|dt| dt.format("%H:%M:%S").to_string()),
        "datetime" => parse_datetime_value(value).map(|dt| dt.format("%d.%m.%Y %H:%M").to_string()),
        "datetime_full" => parse_datetime_value(value).map(|dt| dt.format("%d.%m.%Y %H:%M:%S").to_string()),
        "pg_date" => parse_datetime_value(value).map(|dt| dt.format("%Y-%m-%d").to_string()),
        "pg_datetime" => parse_datetime_value(value).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        "currency" => as_f64(value).map(|n| format!("{n:.2} \u{20bd}")),
        "percent" => as_f64(value).map(|n| format!("{n:.1}%")),
        "number" => as_f64(value).map(|n| format!("{n:.2}")),
        _ => None,
    };

    match formatted {
        Some(s) => Value::String(s),
        None => Value::String(value.stringify()),
    }
}

/// `tags` — `@`-prefixes each element (stripping any leading `@` first),
/// space-joined for a list or applied to a single scalar; empty string for
/// a falsy value.
pub fn tags(value: &Value, _param: Option<&str>) -> Value {
    if !value.truthy() {
        return Value::String(String::new());
    }
    let tag_one = |v: &Value| format!("@{}", v.stringify().trim_start_matches('@'));
    match value {
        Value::List(items) => Value::String(items.iter().map(tag_one).collect::<Vec<_>>().join(" ")),
        other => Value::String(tag_one(other)),
    }
}

/// `list` — one `• item` per line for a list input, a single bullet line
/// for a scalar; empty string for a falsy value.
pub fn list(value: &Value, _param: Option<&str>) -> Value {
    if !value.truthy() {
        return Value::String(String::new());
    }
    match value {
        Value::List(items) => {
            Value::String(items.iter().map(|v| format!("\u{2022} {}", v.stringify())).collect::<Vec<_>>().join("\n"))
        }
        other => Value::String(format!("\u{2022} {}", other.stringify())),
    }
}

/// `comma` — comma-space-joins a list, or stringifies a scalar untouched;
/// empty string for a falsy value.
pub fn comma(value: &Value, _param: Option<&str>) -> Value {
    if !value.truthy() {
        return Value::String(String::new());
    }
    match value {
        Value::List(items) => Value::String(items.iter().map(Value::stringify).collect::<Vec<_>>().join(", ")),
        other => Value::String(other.stringify()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pg_datetime_renders_iso_shape() {
        let input = Value::String("2024-03-15 14:30:45".into());
        assert_eq!(format_value(&input, Some("pg_datetime")), Value::String("2024-03-15 14:30:45".into()));
    }

    #[test]
    fn format_date_renders_day_month_year() {
        let input = Value::String("2024-03-15 14:30:45".into());
        assert_eq!(format_value(&input, Some("date")), Value::String("15.03.2024".into()));
    }

    #[test]
    fn format_currency_renders_two_decimals() {
        assert_eq!(format_value(&Value::float(42.5), Some("currency")), Value::String("42.50 \u{20bd}".into()));
    }

    #[test]
    fn format_zero_is_not_treated_as_falsy() {
        assert_eq!(format_value(&Value::int(0), Some("number")), Value::String("0.00".into()));
    }

    #[test]
    fn format_falsy_value_stringifies_without_applying_the_type() {
        assert_eq!(format_value(&Value::Null, Some("date")), Value::String(String::new()));
    }

    #[test]
    fn format_unparseable_datetime_falls_back_to_stringified_value() {
        let input = Value::String("not a date".into());
        assert_eq!(format_value(&input, Some("date")), Value::String("not a date".into()));
    }

    #[test]
    fn tags_prefixes_list_elements_and_strips_existing_at_signs() {
        let input = Value::List(vec![Value::String("alice".into()), Value::String("@bob".into())]);
        assert_eq!(tags(&input, None), Value::String("@alice @bob".into()));
    }

    #[test]
    fn list_renders_one_bullet_per_line() {
        let input = Value::List(vec![Value::String("a".into()), Value::String("b".into())]);
        assert_eq!(list(&input, None), Value::String("\u{2022} a\n\u{2022} b".into()));
    }

    #[test]
    fn comma_joins_list_elements() {
        let input = Value::List(vec![Value::int(1), Value::int(2), Value::int(3)]);
        assert_eq!(comma(&input, None), Value::String("1, 2, 3".into()));
    }

    #[test]
    fn falsy_values_render_as_empty_string() {
        assert_eq!(tags(&Value::Null, None), Value::String(String::new()));
        assert_eq!(list(&Value::List(vec![]), None), Value::String(String::new()));
        assert_eq!(comma(&Value::Bool(false), None), Value::String(String::new()));
    }
}
