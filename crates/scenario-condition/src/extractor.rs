// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flat equality-atom extraction (§4.C): pulls `$field == literal` atoms out
//! of a compiled condition's top-level `and` chain so a trigger can be
//! indexed in the search tree. Conjuncts that aren't a simple unindexed-field
//! equality (an `or`, a `not`, a dotted/array field, a non-equality operator)
//! are left out of the index — the full [`crate::ast::Expr`] is still stored
//! on the leaf and re-checked in full once the tree narrows candidates down,
//! so skipping an atom only costs index selectivity, never correctness.

use crate::ast::{CompareOp, Expr, Operand};
use indexmap::IndexMap;
use scenario_core::Value;

/// Flattens a conjunction and collects every indexable equality atom,
/// keyed by field name. Fields appearing more than once keep the first
/// occurrence — mirroring the loader's use of an ordinary dict literal.
pub fn extract_search_path(expr: &Expr) -> IndexMap<String, Value> {
    let mut path = IndexMap::new();
    collect(expr, &mut path);
    path
}

fn collect(expr: &Expr, path: &mut IndexMap<String, Value>) {
    match expr {
        Expr::And(l, r) => {
            collect(l, path);
            collect(r, path);
        }
        Expr::Compare(Operand::Field(field), CompareOp::Eq, Operand::Literal(lit)) => {
            if let Some(name) = field.as_simple_name() {
                path.entry(name.to_string()).or_insert_with(|| lit.clone());
            }
        }
        Expr::Compare(Operand::Literal(lit), CompareOp::Eq, Operand::Field(field)) => {
            if let Some(name) = field.as_simple_name() {
                path.entry(name.to_string()).or_insert_with(|| lit.clone());
            }
        }
        _ => {}
    }
}
