// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level condition facade (§4.A–§4.C): parses a trigger's condition
//! string once at load time into a [`CompiledCondition`], which a scenario's
//! trigger row keeps around for the lifetime of the cache snapshot.

use crate::ast::{compile, CompileError, Expr};
use crate::extractor::extract_search_path;
use crate::search_tree::SearchTree;
use crate::tokenizer::tokenize;
use indexmap::IndexMap;
use scenario_core::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub struct CompiledCondition {
    pub expr: Expr,
    pub search_path: IndexMap<String, Value>,
    pub condition_hash: u64,
}

/// Deterministic (not randomly-seeded) hash of the trimmed source string,
/// used to dedupe a trigger's condition across repeated tree insertions.
fn condition_hash(trimmed: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    trimmed.hash(&mut hasher);
    hasher.finish()
}

/// Parses a condition expression, compiling it to an AST and extracting its
/// indexable equality atoms in one pass. A blank/whitespace-only string
/// compiles to an always-true predicate with an empty search path.
pub fn parse_condition_string(source: &str) -> Result<CompiledCondition, CompileError> {
    let trimmed = source.trim();
    let tokens = tokenize(trimmed);
    let expr = compile(&tokens)?;
    let search_path = extract_search_path(&expr);
    Ok(CompiledCondition { expr, search_path, condition_hash: condition_hash(trimmed) })
}

/// Evaluates a compiled condition directly against an event, bypassing the
/// search tree — used for ad hoc predicate checks outside of matching.
pub fn check_match(condition: &CompiledCondition, event: &Value) -> bool {
    condition.expr.eval(event)
}

pub fn add_to_tree(tree: &mut SearchTree, condition: &CompiledCondition, scenario_id: i64) {
    tree.add(&condition.search_path, scenario_id, condition.condition_hash, condition.expr.clone());
}

pub fn search_in_tree(tree: &SearchTree, event: &Value) -> Vec<i64> {
    tree.search(event)
}

/// Joins per-field equality clauses with `and`, and joins several such
/// clause groups with `or` — the builder used to turn a structured trigger
/// configuration (a list of field/value maps) back into a condition string.
pub fn build_condition(groups: &[Vec<(String, Value)>]) -> String {
    groups
        .iter()
        .map(|fields| {
            fields
                .iter()
                .map(|(field, value)| format!("${field} == {}", literal_repr(value)))
                .collect::<Vec<_>>()
                .join(" and ")
        })
        .filter(|clause| !clause.is_empty())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn literal_repr(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.stringify(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_condition_always_matches() {
        let condition = parse_condition_string("   ").unwrap();
        assert!(condition.search_path.is_empty());
        assert!(check_match(&condition, &Value::map()));
    }

    #[test]
    fn same_source_yields_same_hash() {
        let a = parse_condition_string("$a == 1").unwrap();
        let b = parse_condition_string(" $a == 1 ").unwrap();
        assert_eq!(a.condition_hash, b.condition_hash);
    }

    #[test]
    fn build_condition_joins_and_then_or() {
        let groups = vec![
            vec![("a".to_string(), Value::int(1)), ("b".to_string(), Value::int(2))],
            vec![("c".to_string(), Value::String("x".into()))],
        ];
        assert_eq!(build_condition(&groups), r#"$a == 1 and $b == 2 or $c == "x""#);
    }

    #[test]
    fn tree_round_trip_through_facade() {
        let mut tree = SearchTree::new();
        let condition = parse_condition_string("$event_type == \"message\"").unwrap();
        add_to_tree(&mut tree, &condition, 7);

        let event: Value = serde_json::from_str(r#"{"event_type": "message"}"#).unwrap();
        assert_eq!(search_in_tree(&tree, &event), vec![7]);
    }
}
