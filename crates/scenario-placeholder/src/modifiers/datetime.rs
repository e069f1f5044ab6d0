// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Date/time modifiers (§4.D). Grounded in `modifiers_datetime.py`: every
//! modifier parses its input leniently and, on any parse failure, returns
//! the original value untouched rather than raising.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use scenario_core::Value;

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn parse_datetime_value(value: &Value) -> Option<NaiveDateTime> {
    let s = value.as_str()?;
    NaiveDateTime::parse_from_str(s, OUTPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .ok()
}

/// Zeroes out the components of `dt` finer than `period`; `week` rewinds to
/// the preceding Monday. Shared by the `to_second`..`to_year` modifiers.
fn zero_to_period(dt: NaiveDateTime, period: &str) -> Option<NaiveDateTime> {
    match period {
        "second" => dt.with_nanosecond(0),
        "minute" => dt.with_second(0).and_then(|d| d.with_nanosecond(0)),
        "hour" => dt.with_minute(0).and_then(|d| d.with_second(0)).and_then(|d| d.with_nanosecond(0)),
        "date" => dt.date().and_hms_opt(0, 0, 0),
        "week" => {
            let days_from_monday = dt.weekday().num_days_from_monday() as i64;
            (dt.date() - Duration::days(days_from_monday)).and_hms_opt(0, 0, 0)
        }
        "month" => dt.date().with_day(1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        "year" => dt.date().with_month(1).and_then(|d| d.with_day(1)).and_then(|d| d.and_hms_opt(0, 0, 0)),
        _ => None,
    }
}

fn to_period(value: &Value, period: &str) -> Value {
    let Some(dt) = parse_datetime_value(value) else {
        return value.clone();
    };
    match zero_to_period(dt, period) {
        Some(dt) => Value::String(dt.format(OUTPUT_FORMAT).to_string()),
        None => value.clone(),
    }
}

pub fn to_second(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "second")
}

pub fn to_minute(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "minute")
}

pub fn to_hour(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "hour")
}

pub fn to_date(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "date")
}

pub fn to_week(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "week")
}

pub fn to_month(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "month")
}

pub fn to_year(value: &Value, _param: Option<&str>) -> Value {
    to_period(value, "year")
}

static TIME_UNIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(w|d|h|m|s)\b").expect("valid time-unit regex"));
static TIME_STRING_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\s]+$").expect("valid time-string shape regex"));

/// `seconds` — parses a `Xw Yd Zh Km Ms` duration string (any subset, any
/// order, case-insensitive units) into a total second count; an unparseable
/// or all-zero duration yields `null`.
pub fn seconds(value: &Value, _param: Option<&str>) -> Value {
    if !value.truthy() {
        return Value::Null;
    }
    let text = value.stringify();
    let trimmed = text.trim();
    if trimmed.is_empty() || !TIME_STRING_SHAPE.is_match(trimmed) {
        return Value::Null;
    }

    let mut total = 0i64;
    let mut found = false;
    for caps in TIME_UNIT.captures_iter(trimmed) {
        let Ok(amount) = caps[1].parse::<i64>() else { continue };
        found = true;
        total += amount
            * match caps[2].to_ascii_lowercase().as_str() {
                "w" => 604_800,
                "d" => 86_400,
                "h" => 3_600,
                "m" => 60,
                "s" => 1,
                _ => 0,
            };
    }

    if found && total > 0 {
        Value::int(total)
    } else {
        Value::Null
    }
}

/// `shift:+1d` / `shift:-30m` — shifts by a signed count and a unit suffix
/// (`s`, `m`, `h`, `d`, `w`); an unparseable shift spec is a no-op.
pub fn shift(value: &Value, param: Option<&str>) -> Value {
    let (Some(dt), Some(spec)) = (parse_datetime_value(value), param) else {
        return value.clone();
    };
    let spec = spec.trim();
    if spec.len() < 2 {
        return value.clone();
    }
    let split = spec.len() - 1;
    let (amount_str, unit) = (&spec[..split], &spec[split..]);
    let Ok(amount) = amount_str.parse::<i64>() else {
        return value.clone();
    };
    let delta = match unit {
        "s" => Duration::seconds(amount),
        "m" => Duration::minutes(amount),
        "h" => Duration::hours(amount),
        "d" => Duration::days(amount),
        "w" => Duration::weeks(amount),
        _ => return value.clone(),
    };
    Value::String((dt + delta).format(OUTPUT_FORMAT).to_string())
}

/// `timestamp` — converts a parsed datetime to Unix epoch seconds (UTC-naive
/// arithmetic, matching the value's own clock rather than reinterpreting it).
pub fn timestamp(value: &Value, _param: Option<&str>) -> Value {
    match parse_datetime_value(value) {
        Some(dt) => Value::int(dt.and_utc().timestamp()),
        None => value.clone(),
    }
}
