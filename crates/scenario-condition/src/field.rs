// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Field-path resolution for compiled predicates (§4.B).
//!
//! `$a.b[2].c` walks dotted keys and indexes lists; negative indices count
//! from the end; a missing key or out-of-range index resolves to `Value::Null`
//! rather than erroring — the compiled predicate must never throw.

use scenario_core::Value;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Name(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Returns the field name when the path is a single unindexed segment
    /// (e.g. `$status`, not `$a.b` or `$items[0]`) — the shape the search
    /// tree indexes on.
    pub fn as_simple_name(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [Segment::Name(name)] => Some(name),
            _ => None,
        }
    }

    pub fn parse(field: &str) -> FieldPath {
        let mut segments = Vec::new();
        for raw_part in field.split('.') {
            if raw_part.is_empty() {
                continue;
            }
            let mut chars = raw_part.char_indices().peekable();
            let mut name_end = raw_part.len();
            if let Some(bracket_pos) = raw_part.find('[') {
                name_end = bracket_pos;
            }
            let name = &raw_part[..name_end];
            if !name.is_empty() {
                segments.push(Segment::Name(name.to_string()));
            }
            let _ = &mut chars;

            let mut rest = &raw_part[name_end..];
            while let Some(open) = rest.find('[') {
                let Some(close) = rest[open..].find(']') else {
                    break;
                };
                let idx_str = &rest[open + 1..open + close];
                if let Ok(idx) = idx_str.trim().parse::<i64>() {
                    segments.push(Segment::Index(idx));
                }
                rest = &rest[open + close + 1..];
            }
        }
        FieldPath { segments }
    }

    pub fn resolve(&self, root: &Value) -> Value {
        let mut current = root.clone();
        for segment in &self.segments {
            current = match (segment, &current) {
                (Segment::Name(name), Value::Map(m)) => m.get(name).cloned().unwrap_or(Value::Null),
                (Segment::Index(i), Value::List(l)) => index_list(l, *i),
                _ => Value::Null,
            };
        }
        current
    }
}

fn index_list(list: &[Value], idx: i64) -> Value {
    let len = list.len() as i64;
    let resolved = if idx < 0 { len + idx } else { idx };
    if resolved < 0 || resolved >= len {
        Value::Null
    } else {
        list[resolved as usize].clone()
    }
}
