// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inline arithmetic modifiers (`{$price|*1.2}`, `{$count|+1}`). Detected by
//! the processor when a modifier token's first character is one of
//! `/ + - * %` rather than a name — the operator symbol itself doubles as
//! the modifier's name, and the remainder is the operand.

use scenario_core::{Number, Value};

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn apply(value: &Value, param: Option<&str>, op: impl Fn(f64, f64) -> f64) -> Value {
    let (Some(lhs), Some(operand)) = (as_f64(value), param.and_then(|p| p.trim().parse::<f64>().ok()))
    else {
        return value.clone();
    };
    Value::Number(Number::from_f64_preserving(op(lhs, operand)))
}

pub fn add(value: &Value, param: Option<&str>) -> Value {
    apply(value, param, |a, b| a + b)
}

pub fn subtract(value: &Value, param: Option<&str>) -> Value {
    apply(value, param, |a, b| a - b)
}

pub fn multiply(value: &Value, param: Option<&str>) -> Value {
    apply(value, param, |a, b| a * b)
}

/// Division by zero leaves the value unchanged rather than producing `inf`.
pub fn divide(value: &Value, param: Option<&str>) -> Value {
    if param.and_then(|p| p.trim().parse::<f64>().ok()) == Some(0.0) {
        return value.clone();
    }
    apply(value, param, |a, b| a / b)
}

pub fn modulo(value: &Value, param: Option<&str>) -> Value {
    if param.and_then(|p| p.trim().parse::<f64>().ok()) == Some(0.0) {
        return value.clone();
    }
    apply(value, param, |a, b| a % b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_integer_when_result_is_whole() {
        assert_eq!(add(&Value::int(2), Some("3")), Value::int(5));
    }

    #[test]
    fn multiply_promotes_to_float_when_fractional() {
        assert_eq!(multiply(&Value::int(3), Some("1.5")), Value::float(4.5));
    }

    #[test]
    fn divide_by_zero_is_a_no_op() {
        assert_eq!(divide(&Value::int(10), Some("0")), Value::int(10));
    }

    #[test]
    fn non_numeric_value_passes_through_unchanged() {
        let original = Value::String("abc".into());
        assert_eq!(add(&original, Some("1")), original);
    }
}
