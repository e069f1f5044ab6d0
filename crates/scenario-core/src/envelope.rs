// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action result envelope shared by every action invocation (§6, §4.H).

use crate::error::ActionError;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Well-known `result` strings. Actions may also return a custom string;
/// [`ActionResult::Custom`] carries those through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Success,
    Error,
    NotFound,
    Timeout,
    #[serde(untagged)]
    Custom(String),
}

impl ActionResult {
    pub fn as_str(&self) -> &str {
        match self {
            ActionResult::Success => "success",
            ActionResult::Error => "error",
            ActionResult::NotFound => "not_found",
            ActionResult::Timeout => "timeout",
            ActionResult::Custom(s) => s,
        }
    }

    pub fn custom(s: impl Into<String>) -> ActionResult {
        let s = s.into();
        match s.as_str() {
            "success" => ActionResult::Success,
            "error" => ActionResult::Error,
            "not_found" => ActionResult::NotFound,
            "timeout" => ActionResult::Timeout,
            _ => ActionResult::Custom(s),
        }
    }
}

/// `{result, response_data?, error?}` — the shape every action must return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub result: ActionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
}

impl Envelope {
    pub fn success() -> Self {
        Self {
            result: ActionResult::Success,
            response_data: None,
            error: None,
        }
    }

    pub fn success_with(response_data: IndexMap<String, Value>) -> Self {
        Self {
            result: ActionResult::Success,
            response_data: Some(response_data),
            error: None,
        }
    }

    pub fn error(error: ActionError) -> Self {
        Self {
            result: ActionResult::Error,
            response_data: None,
            error: Some(error),
        }
    }

    /// Reads `response_data.scenario_result`, used by §4.I to let actions
    /// like `execute_scenario` propagate `abort`/`stop` out-of-band.
    pub fn scenario_result(&self) -> Option<&str> {
        self.response_data
            .as_ref()
            .and_then(|m| m.get("scenario_result"))
            .and_then(|v| v.as_str())
    }
}
