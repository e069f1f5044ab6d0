// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture file format: a flat JSON description of scenarios, triggers,
//! steps, and transitions that gets seeded into an [`InMemoryRepository`]
//! for a one-shot run. Not part of the engine itself — this is the demo
//! harness's own concern, kept out of `scenario-store`'s runtime model.

use scenario_core::{ScenarioId, StepId, TenantId, TriggerId, Value};
use scenario_store::{InMemoryRepository, ScheduledScenario, Scenario, Step, Transition, Trigger};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct FixtureFile {
    pub scenarios: Vec<FixtureScenario>,
}

#[derive(Deserialize)]
pub struct FixtureScenario {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    #[serde(default)]
    pub cron: Option<String>,
    #[serde(default)]
    pub raw_data: Value,
    #[serde(default)]
    pub triggers: Vec<FixtureTrigger>,
    #[serde(default)]
    pub steps: Vec<FixtureStep>,
}

#[derive(Deserialize)]
pub struct FixtureTrigger {
    pub id: i64,
    pub condition: String,
}

#[derive(Deserialize)]
pub struct FixtureStep {
    pub id: i64,
    pub order: i64,
    pub action_name: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub is_async: bool,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub transitions: Vec<FixtureTransition>,
}

#[derive(Deserialize)]
pub struct FixtureTransition {
    pub action_result: String,
    pub action: String,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Seeds every scenario in the fixture into `repo`.
pub fn load_into(repo: &InMemoryRepository, fixture: FixtureFile) {
    for scenario in fixture.scenarios {
        let scenario_id = ScenarioId::from(scenario.id);
        let tenant_id = TenantId::from(scenario.tenant_id);

        let triggers = scenario
            .triggers
            .into_iter()
            .map(|t| Trigger {
                id: TriggerId::from(t.id),
                scenario_id,
                condition_expression: t.condition,
                raw_data: Value::map(),
            })
            .collect();

        let steps = scenario
            .steps
            .into_iter()
            .map(|s| {
                let step_id = StepId::from(s.id);
                let transitions = s
                    .transitions
                    .into_iter()
                    .map(|t| Transition {
                        step_id,
                        action_result: t.action_result,
                        action: t.action,
                        value: t.value,
                    })
                    .collect();
                (
                    Step {
                        id: step_id,
                        scenario_id,
                        step_order: s.order,
                        action_name: s.action_name,
                        params: s.params,
                        is_async: s.is_async,
                        action_id: s.action_id,
                        raw_data: Value::map(),
                    },
                    transitions,
                )
            })
            .collect();

        let scheduled = scenario.cron.as_ref().map(|cron| ScheduledScenario {
            scenario_id,
            tenant_id,
            scenario_name: scenario.name.clone(),
            cron: cron.clone(),
            last_run: None,
        });

        repo.seed_scenario(
            Scenario {
                id: scenario_id,
                tenant_id,
                name: scenario.name,
                schedule: scenario.cron,
                raw_data: scenario.raw_data,
            },
            triggers,
            steps,
            scheduled,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_a_scenario_with_trigger_and_step() {
        let fixture: FixtureFile = serde_json::from_str(
            r#"{
                "scenarios": [{
                    "id": 1, "tenant_id": 7, "name": "greet",
                    "triggers": [{"id": 1, "condition": "$event_type == \"message\""}],
                    "steps": [{"id": 1, "order": 0, "action_name": "send_message", "params": {"text": "hi"}}]
                }]
            }"#,
        )
        .unwrap();

        let repo = InMemoryRepository::new();
        load_into(&repo, fixture);

        let scenarios = scenario_store::ScenarioRepository::get_scenarios_by_tenant(&repo, TenantId::from(7))
            .await
            .unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "greet");
    }
}
