// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Placeholder/template substitution: resolves `{path|mod:arg|mod:arg}`
//! references against a values tree, applying chained modifiers and
//! preserving non-string types when a whole string is exactly one
//! placeholder.

mod modifiers;
mod path;
mod processor;
mod type_utils;

pub use path::{extract_literal_or_get_value, get_nested_value};
pub use processor::PlaceholderProcessor;
pub use type_utils::determine_result_type;
