// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder substitution engine (§4.D): walks a data tree or a single
//! string, replacing `{path|mod:arg|mod:arg}` placeholders with values
//! looked up against a values tree (typically the in-flight scenario
//! `data`), applying each chained modifier left to right.

use crate::modifiers;
use crate::path::extract_literal_or_get_value;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scenario_core::Value;

/// One level of brace nesting is tolerated inside a placeholder body —
/// deeper nesting resolves through the recursive re-processing in
/// [`PlaceholderProcessor::process_chain`] rather than the regex itself.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{((?:[^{}]|\{[^{}]*\})+)\}").expect("valid placeholder regex"));

pub struct PlaceholderProcessor {
    max_nesting_depth: u32,
}

impl PlaceholderProcessor {
    pub fn new(max_nesting_depth: u32) -> Self {
        Self { max_nesting_depth }
    }

    /// Processes every placeholder found anywhere in a string/list/map tree,
    /// preserving non-string values and non-placeholder text untouched.
    pub fn process(&self, data: &Value, values: &Value) -> Value {
        self.process_value(data, values, 0)
    }

    /// Like [`Self::process`], but deep-merges the processed result back
    /// into the original data so fields with no placeholders at all survive
    /// even where the walker rebuilt their containing map/list.
    pub fn process_full(&self, data: &Value, values: &Value) -> Value {
        data.deep_merge(&self.process(data, values))
    }

    /// String-only entry point: always returns a string, stringifying any
    /// typed placeholder result that lands in mixed text.
    pub fn process_text(&self, text: &str, values: &Value) -> String {
        match self.process_string(text, values, 0) {
            Value::String(s) => s,
            other => other.stringify(),
        }
    }

    fn process_value(&self, data: &Value, values: &Value, depth: u32) -> Value {
        match data {
            Value::String(s) => self.process_string(s, values, depth),
            Value::List(items) => Value::List(
                items.iter().flat_map(|item| self.process_list_item(item, values, depth)).collect(),
            ),
            Value::Map(map) => {
                let mut result = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    result.insert(key.clone(), self.process_value(value, values, depth));
                }
                Value::Map(result)
            }
            other => other.clone(),
        }
    }

    /// A list item that is itself a single placeholder resolving to a list
    /// gets flattened one level into the surrounding array (the `|expand`
    /// convention) instead of nesting a list inside a list.
    fn process_list_item(&self, item: &Value, values: &Value, depth: u32) -> Vec<Value> {
        if let Value::String(s) = item {
            if is_entire_placeholder(s) {
                if let Value::List(flattened) = self.process_string(s, values, depth) {
                    return flattened;
                }
                return vec![self.process_string(s, values, depth)];
            }
        }
        vec![self.process_value(item, values, depth)]
    }

    fn process_string(&self, text: &str, values: &Value, depth: u32) -> Value {
        if !text.contains('{') || !text.contains('}') {
            return Value::String(text.to_string());
        }
        if depth >= self.max_nesting_depth {
            return Value::String(text.to_string());
        }

        if is_entire_placeholder(text) {
            let inner = &text[1..text.len() - 1];
            return self.process_chain(inner, values, depth);
        }

        let mut current = text.to_string();
        for _ in 0..self.max_nesting_depth {
            if !current.contains('{') {
                break;
            }
            let next = PLACEHOLDER
                .replace_all(&current, |caps: &regex::Captures| {
                    self.process_chain(&caps[1], values, depth + 1).stringify()
                })
                .into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        Value::String(current)
    }

    /// Resolves one placeholder body: `field|mod:arg|mod:arg`. Nested
    /// placeholders inside the field/modifier text are resolved first (up
    /// to the nesting limit); an unresolved field with no modifier able to
    /// supply a replacement is returned as the original text wrapped back
    /// in braces, verbatim, as a debugging aid.
    fn process_chain(&self, placeholder: &str, values: &Value, depth: u32) -> Value {
        if depth >= self.max_nesting_depth {
            return Value::String(format!("{{{placeholder}}}"));
        }

        let resolved_text = if placeholder.contains('{') {
            match self.process_string(placeholder, values, depth + 1) {
                Value::String(s) => s,
                other => other.stringify(),
            }
        } else {
            placeholder.to_string()
        };

        let mut parts = resolved_text.splitn(2, '|');
        let field_name = parts.next().unwrap_or_default().trim();
        let modifier_chain = parts.next().unwrap_or_default();

        let mut value = extract_literal_or_get_value(field_name, values).unwrap_or(Value::Null);

        for modifier_token in split_modifiers(modifier_chain) {
            value = apply_modifier(&value, modifier_token);
        }

        if value.is_null() {
            Value::String(format!("{{{placeholder}}}"))
        } else {
            value
        }
    }
}

/// Splits a modifier chain on `|`, but arithmetic modifiers (`+1`, `/2`)
/// never contain a further `|`, so a plain split is sufficient — each
/// segment is one `name[:param]` or `<op><operand>` modifier.
fn split_modifiers(chain: &str) -> impl Iterator<Item = &str> {
    chain.split('|').filter(|s| !s.is_empty())
}

fn is_arithmetic_op(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%')
}

fn apply_modifier(value: &Value, token: &str) -> Value {
    let token = token.trim();
    if token.is_empty() {
        return value.clone();
    }

    if let Some(op) = token.chars().next().filter(|c| is_arithmetic_op(*c)) {
        let operand = &token[op.len_utf8()..];
        return match op {
            '+' => crate::modifiers::arithmetic::add(value, Some(operand)),
            '-' => crate::modifiers::arithmetic::subtract(value, Some(operand)),
            '*' => crate::modifiers::arithmetic::multiply(value, Some(operand)),
            '/' => crate::modifiers::arithmetic::divide(value, Some(operand)),
            '%' => crate::modifiers::arithmetic::modulo(value, Some(operand)),
            _ => unreachable!(),
        };
    }

    let (name, param) = match token.split_once(':') {
        Some((name, param)) => (name.trim(), Some(param)),
        None => (token, None),
    };

    if name == "fallback" {
        return modifiers::fallback(value, param);
    }

    match modifiers::lookup(name) {
        Some(f) => f(value, param),
        None => {
            tracing::warn!(modifier = name, "unknown placeholder modifier, leaving value unchanged");
            value.clone()
        }
    }
}

/// The whole string is exactly one balanced-brace placeholder: `{` at
/// position 0, `}` at the last byte, and brace depth returns to zero only
/// at that final character.
fn is_entire_placeholder(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes[0] != b'{' || bytes[bytes.len() - 1] != b'}' {
        return false;
    }
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i == bytes.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

#[path = "processor_tests.rs"]
#[cfg(test)]
mod tests;
