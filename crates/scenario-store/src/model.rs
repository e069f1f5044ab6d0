// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted entities backing the scenario engine (§3). Field shapes follow
//! what the loader (§4.F) and scheduler (§4.L) actually read off each row;
//! `raw_data` keeps the untyped remainder around the way the original's
//! dict-shaped rows do, for actions/placeholders that reach into it.

use chrono::{DateTime, Local};
use scenario_core::{BotId, ScenarioId, StepId, TenantId, TriggerId, Value};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: ScenarioId,
    pub tenant_id: TenantId,
    pub name: String,
    pub schedule: Option<String>,
    pub raw_data: Value,
}

#[derive(Debug, Clone)]
pub struct Trigger {
    pub id: TriggerId,
    pub scenario_id: ScenarioId,
    pub condition_expression: String,
    pub raw_data: Value,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub id: StepId,
    pub scenario_id: ScenarioId,
    pub step_order: i64,
    pub action_name: String,
    pub params: Value,
    pub is_async: bool,
    pub action_id: Option<String>,
    pub raw_data: Value,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub step_id: StepId,
    /// The `action_result` this row matches against, or `"any"` as the
    /// catch-all transition the step falls back to (§4.I).
    pub action_result: String,
    pub action: String,
    pub value: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ScheduledScenario {
    pub scenario_id: ScenarioId,
    pub tenant_id: TenantId,
    pub scenario_name: String,
    pub cron: String,
    pub last_run: Option<DateTime<Local>>,
}

#[derive(Debug, Clone)]
pub struct Bot {
    pub id: BotId,
    pub tenant_id: TenantId,
}

#[derive(Debug, Clone)]
pub struct TenantConfig {
    pub tenant_id: TenantId,
    pub config: Value,
}
