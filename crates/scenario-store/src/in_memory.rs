// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference [`ScenarioRepository`] implementation backed by in-process
//! maps. Used by the CLI demo and the engine's own tests — grounded in the
//! teacher's preference for a `parking_lot`-guarded in-memory store as the
//! cheapest real implementation of a storage trait.

use crate::model::{Bot, ScheduledScenario, Scenario, Step, TenantConfig, Transition, Trigger};
use crate::repository::{ScenarioRepository, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use scenario_core::{ScenarioId, StepId, TenantId};
use std::collections::HashMap;

#[derive(Default)]
struct State {
    scenarios: HashMap<ScenarioId, Scenario>,
    triggers: HashMap<ScenarioId, Vec<Trigger>>,
    steps: HashMap<ScenarioId, Vec<Step>>,
    transitions: HashMap<StepId, Vec<Transition>>,
    scheduled: HashMap<ScenarioId, ScheduledScenario>,
    bots: HashMap<TenantId, Bot>,
    tenant_configs: HashMap<TenantId, TenantConfig>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_bot(&self, bot: Bot) {
        self.state.lock().bots.insert(bot.tenant_id, bot);
    }

    pub fn seed_tenant_config(&self, config: TenantConfig) {
        self.state.lock().tenant_configs.insert(config.tenant_id, config);
    }

    pub fn seed_scenario(
        &self,
        scenario: Scenario,
        triggers: Vec<Trigger>,
        steps: Vec<(Step, Vec<Transition>)>,
        scheduled: Option<ScheduledScenario>,
    ) {
        let mut state = self.state.lock();
        let scenario_id = scenario.id;
        state.triggers.insert(scenario_id, triggers);
        let mut step_rows = Vec::with_capacity(steps.len());
        for (step, transitions) in steps {
            state.transitions.insert(step.id, transitions);
            step_rows.push(step);
        }
        state.steps.insert(scenario_id, step_rows);
        if let Some(scheduled) = scheduled {
            state.scheduled.insert(scenario_id, scheduled);
        }
        state.scenarios.insert(scenario_id, scenario);
    }
}

#[async_trait]
impl ScenarioRepository for InMemoryRepository {
    async fn get_scenarios_by_tenant(&self, tenant_id: TenantId) -> Result<Vec<Scenario>, StoreError> {
        Ok(self
            .state
            .lock()
            .scenarios
            .values()
            .filter(|s| s.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get_triggers_by_scenario(&self, scenario_id: ScenarioId) -> Result<Vec<Trigger>, StoreError> {
        Ok(self.state.lock().triggers.get(&scenario_id).cloned().unwrap_or_default())
    }

    async fn get_steps_by_scenario(&self, scenario_id: ScenarioId) -> Result<Vec<Step>, StoreError> {
        Ok(self.state.lock().steps.get(&scenario_id).cloned().unwrap_or_default())
    }

    async fn get_transitions_by_step(&self, step_id: StepId) -> Result<Vec<Transition>, StoreError> {
        Ok(self.state.lock().transitions.get(&step_id).cloned().unwrap_or_default())
    }

    async fn get_scheduled_scenarios(
        &self,
        tenant_id: Option<TenantId>,
    ) -> Result<Vec<ScheduledScenario>, StoreError> {
        let state = self.state.lock();
        Ok(state
            .scheduled
            .values()
            .filter(|s| match tenant_id {
                Some(t) => t == s.tenant_id,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_bot_by_tenant_id(&self, tenant_id: TenantId) -> Result<Option<Bot>, StoreError> {
        Ok(self.state.lock().bots.get(&tenant_id).cloned())
    }

    async fn get_tenant_config(&self, tenant_id: TenantId) -> Result<Option<TenantConfig>, StoreError> {
        Ok(self.state.lock().tenant_configs.get(&tenant_id).cloned())
    }

    async fn update_scenario_last_run(
        &self,
        scenario_id: ScenarioId,
        last_run: DateTime<Local>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(scheduled) = state.scheduled.get_mut(&scenario_id) {
            scheduled.last_run = Some(last_run);
        }
        Ok(())
    }

    async fn delete_scenarios_by_tenant(&self, tenant_id: TenantId) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let ids: Vec<ScenarioId> =
            state.scenarios.values().filter(|s| s.tenant_id == tenant_id).map(|s| s.id).collect();
        for id in ids {
            state.scenarios.remove(&id);
            state.triggers.remove(&id);
            if let Some(steps) = state.steps.remove(&id) {
                for step in steps {
                    state.transitions.remove(&step.id);
                }
            }
            state.scheduled.remove(&id);
        }
        Ok(())
    }

    async fn save_scenario(
        &self,
        scenario: Scenario,
        triggers: Vec<Trigger>,
        steps: Vec<(Step, Vec<Transition>)>,
    ) -> Result<(), StoreError> {
        self.seed_scenario(scenario, triggers, steps, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::Value;

    fn scenario(id: i64, tenant_id: i64) -> Scenario {
        Scenario {
            id: ScenarioId::from(id),
            tenant_id: TenantId::from(tenant_id),
            name: format!("scenario-{id}"),
            schedule: None,
            raw_data: Value::map(),
        }
    }

    #[tokio::test]
    async fn seeded_scenario_is_retrievable_by_tenant() {
        let repo = InMemoryRepository::new();
        repo.seed_scenario(scenario(1, 42), vec![], vec![], None);

        let scenarios = repo.get_scenarios_by_tenant(TenantId::from(42)).await.unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "scenario-1");
    }

    #[tokio::test]
    async fn delete_by_tenant_removes_scenario_and_its_children() {
        let repo = InMemoryRepository::new();
        let step = Step {
            id: StepId::from(1),
            scenario_id: ScenarioId::from(1),
            step_order: 0,
            action_name: "noop".into(),
            params: Value::map(),
            is_async: false,
            action_id: None,
            raw_data: Value::map(),
        };
        repo.seed_scenario(scenario(1, 42), vec![], vec![(step, vec![])], None);

        repo.delete_scenarios_by_tenant(TenantId::from(42)).await.unwrap();

        assert!(repo.get_scenarios_by_tenant(TenantId::from(42)).await.unwrap().is_empty());
        assert!(repo.get_steps_by_scenario(ScenarioId::from(1)).await.unwrap().is_empty());
    }
}
