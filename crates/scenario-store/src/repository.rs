// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage seam (§4 EXPANSION): every read the engine needs to rebuild a
//! tenant's scenario cache, plus the writes `sync_scenarios` performs during
//! a bulk resync. Object-safe via `async_trait` so the engine can hold a
//! `dyn ScenarioRepository` behind an `Arc`.

use crate::model::{Bot, ScheduledScenario, Scenario, Step, TenantConfig, Transition, Trigger};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use scenario_core::{ScenarioId, StepId, TenantId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scenario {0} not found")]
    ScenarioNotFound(ScenarioId),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    async fn get_scenarios_by_tenant(&self, tenant_id: TenantId) -> Result<Vec<Scenario>, StoreError>;
    async fn get_triggers_by_scenario(&self, scenario_id: ScenarioId) -> Result<Vec<Trigger>, StoreError>;
    async fn get_steps_by_scenario(&self, scenario_id: ScenarioId) -> Result<Vec<Step>, StoreError>;
    async fn get_transitions_by_step(&self, step_id: StepId) -> Result<Vec<Transition>, StoreError>;

    /// `None` returns every scheduled scenario across all tenants — used at
    /// startup (§4.L); `Some(tenant_id)` scopes a single-tenant reload.
    async fn get_scheduled_scenarios(
        &self,
        tenant_id: Option<TenantId>,
    ) -> Result<Vec<ScheduledScenario>, StoreError>;

    async fn get_bot_by_tenant_id(&self, tenant_id: TenantId) -> Result<Option<Bot>, StoreError>;
    async fn get_tenant_config(&self, tenant_id: TenantId) -> Result<Option<TenantConfig>, StoreError>;

    /// Always called after a scheduled run completes, success or failure,
    /// so a stuck scenario doesn't re-fire every tick (§4.L).
    async fn update_scenario_last_run(
        &self,
        scenario_id: ScenarioId,
        last_run: DateTime<Local>,
    ) -> Result<(), StoreError>;

    async fn delete_scenarios_by_tenant(&self, tenant_id: TenantId) -> Result<(), StoreError>;

    async fn save_scenario(
        &self,
        scenario: Scenario,
        triggers: Vec<Trigger>,
        steps: Vec<(Step, Vec<Transition>)>,
    ) -> Result<(), StoreError>;
}
