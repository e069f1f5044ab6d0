// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nested prefix-tree index over compiled triggers (§4.C / §3 "search tree").
//!
//! Each level narrows on one indexed field's value; every node also carries
//! the full predicates that must still match at that point in the tree. A
//! lookup only ever *narrows* candidates through exact-value branches — the
//! full [`Expr`] is always the final word on whether a scenario matches,
//! which is what lets triggers with no indexable atoms (pure `or`/`not`
//! conditions) sit safely at the root and still be checked on every event.

use crate::ast::Expr;
use indexmap::IndexMap;
use scenario_core::Value;
use std::collections::HashSet;
use std::sync::Arc;

pub struct IndexedCondition {
    pub scenario_id: i64,
    pub condition_hash: u64,
    pub expr: Expr,
}

#[derive(Default)]
struct TreeNode {
    conditions: Vec<Arc<IndexedCondition>>,
    children: IndexMap<String, IndexMap<String, TreeNode>>,
}

#[derive(Default)]
pub struct SearchTree {
    root: TreeNode,
}

impl SearchTree {
    pub fn new() -> SearchTree {
        SearchTree::default()
    }

    /// Indexes a compiled condition under its flat equality atoms. An empty
    /// `search_path` (no indexable atoms were found) files the condition at
    /// the root, so it is evaluated on every lookup.
    ///
    /// Atom keys are visited in sorted order rather than source (conjunct)
    /// order so two conditions sharing the same atom set always converge on
    /// the same tree path regardless of how the trigger wrote its `and`s.
    pub fn add(
        &mut self,
        search_path: &IndexMap<String, Value>,
        scenario_id: i64,
        condition_hash: u64,
        expr: Expr,
    ) {
        let mut node = &mut self.root;
        let mut keys: Vec<&String> = search_path.keys().collect();
        keys.sort();
        for key in keys {
            let value_key = search_path[key].stringify();
            let field_map = node.children.entry(key.clone()).or_default();
            node = field_map.entry(value_key).or_default();
        }

        let already_present = node
            .conditions
            .iter()
            .any(|c| c.condition_hash == condition_hash && c.scenario_id == scenario_id);
        if !already_present {
            node.conditions.push(Arc::new(IndexedCondition { scenario_id, condition_hash, expr }));
        }
    }

    /// Returns every scenario id whose compiled predicate matches `event`,
    /// in first-discovered order with duplicates removed (the same scenario
    /// can appear at more than one tree level via different triggers).
    pub fn search(&self, event: &Value) -> Vec<i64> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();
        self.search_node(&self.root, event, &mut seen, &mut matches);
        matches
    }

    fn search_node(
        &self,
        node: &TreeNode,
        event: &Value,
        seen: &mut HashSet<i64>,
        matches: &mut Vec<i64>,
    ) {
        for condition in &node.conditions {
            if condition.expr.eval(event) && seen.insert(condition.scenario_id) {
                matches.push(condition.scenario_id);
            }
        }

        for (field_name, value_map) in &node.children {
            let field_value = match event.as_map().and_then(|m| m.get(field_name)) {
                Some(v) => v.stringify(),
                None => continue,
            };
            if let Some(child) = value_map.get(&field_value) {
                self.search_node(child, event, seen, matches);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::compile;
    use crate::extractor::extract_search_path;
    use crate::tokenizer::tokenize;

    fn index(tree: &mut SearchTree, scenario_id: i64, condition: &str) {
        let expr = compile(&tokenize(condition)).expect("valid condition");
        let path = extract_search_path(&expr);
        tree.add(&path, scenario_id, scenario_id as u64, expr);
    }

    fn event(json: &str) -> Value {
        serde_json::from_str(json).expect("valid test fixture")
    }

    #[test]
    fn finds_scenario_by_indexed_equality() {
        let mut tree = SearchTree::new();
        index(&mut tree, 1, "$event_type == \"message\"");
        index(&mut tree, 2, "$event_type == \"callback\"");

        let hits = tree.search(&event(r#"{"event_type": "message"}"#));
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn root_conditions_without_search_path_always_checked() {
        let mut tree = SearchTree::new();
        index(&mut tree, 1, "$a == 1 or $b == 2");

        assert_eq!(tree.search(&event(r#"{"b": 2}"#)), vec![1]);
        assert!(tree.search(&event(r#"{"b": 9}"#)).is_empty());
    }

    #[test]
    fn duplicate_condition_is_not_indexed_twice() {
        let mut tree = SearchTree::new();
        index(&mut tree, 1, "$event_type == \"message\"");
        index(&mut tree, 1, "$event_type == \"message\"");

        assert_eq!(tree.search(&event(r#"{"event_type": "message"}"#)), vec![1]);
    }

    #[test]
    fn conjoined_atoms_narrow_through_multiple_levels() {
        let mut tree = SearchTree::new();
        index(&mut tree, 1, "$a == 1 and $b == 2");

        assert!(tree.search(&event(r#"{"a": 1}"#)).is_empty());
        assert_eq!(tree.search(&event(r#"{"a": 1, "b": 2}"#)), vec![1]);
    }
}
