// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario loader (§4.F): rebuilds a tenant's [`TenantSnapshot`] from
//! storage. Never propagates a storage failure past itself — an unreadable
//! or partially-broken tenant comes back as an empty-but-valid snapshot
//! (no scenarios match anything) rather than poisoning the cache.

use crate::cache::{CompiledTrigger, ScenarioEntry, TenantSnapshot};
use scenario_core::TenantId;
use scenario_store::ScenarioRepository;

pub struct ScenarioLoader {
    repository: std::sync::Arc<dyn ScenarioRepository>,
}

impl ScenarioLoader {
    pub fn new(repository: std::sync::Arc<dyn ScenarioRepository>) -> Self {
        Self { repository }
    }

    pub async fn load_tenant_scenarios(&self, tenant_id: TenantId) -> TenantSnapshot {
        let mut snapshot = TenantSnapshot::empty();

        let scenarios = match self.repository.get_scenarios_by_tenant(tenant_id).await {
            Ok(scenarios) => scenarios,
            Err(error) => {
                tracing::warn!(%tenant_id, %error, "failed to load scenarios for tenant");
                return snapshot;
            }
        };

        for scenario in scenarios {
            let compiled_triggers = self.load_triggers(&mut snapshot, scenario.id).await;
            let steps = self.load_steps(scenario.id).await;

            snapshot.scenario_name_index.insert(scenario.name.clone(), scenario.id);
            snapshot.scenario_index.insert(
                scenario.id,
                ScenarioEntry {
                    id: scenario.id,
                    name: scenario.name.clone(),
                    raw_data: scenario.raw_data.clone(),
                    triggers: compiled_triggers,
                    steps,
                },
            );
        }

        snapshot
    }

    /// Compiles every trigger row for a scenario and indexes the ones whose
    /// condition parsed cleanly; a trigger with a malformed expression is
    /// logged and skipped rather than failing the whole scenario's load.
    async fn load_triggers(
        &self,
        snapshot: &mut TenantSnapshot,
        scenario_id: scenario_core::ScenarioId,
    ) -> Vec<CompiledTrigger> {
        let rows = self.repository.get_triggers_by_scenario(scenario_id).await.unwrap_or_default();
        let mut compiled = Vec::with_capacity(rows.len());
        for trigger in rows {
            match scenario_condition::parse_condition_string(&trigger.condition_expression) {
                Ok(condition) => {
                    scenario_condition::add_to_tree(&mut snapshot.search_tree, &condition, scenario_id.0);
                    compiled.push(CompiledTrigger { trigger, condition });
                }
                Err(error) => {
                    tracing::warn!(
                        trigger_id = trigger.id.0,
                        %error,
                        "skipping trigger with unparseable condition"
                    );
                }
            }
        }
        compiled
    }

    async fn load_steps(
        &self,
        scenario_id: scenario_core::ScenarioId,
    ) -> Vec<(scenario_store::Step, Vec<scenario_store::Transition>)> {
        let mut rows = self.repository.get_steps_by_scenario(scenario_id).await.unwrap_or_default();
        rows.sort_by_key(|step| step.step_order);

        let mut steps = Vec::with_capacity(rows.len());
        for step in rows {
            let transitions = self.repository.get_transitions_by_step(step.id).await.unwrap_or_default();
            steps.push((step, transitions));
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{ScenarioId, TriggerId, Value};
    use scenario_store::{InMemoryRepository, Scenario, Trigger};
    use std::sync::Arc;

    #[tokio::test]
    async fn loads_scenario_with_indexable_trigger() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.seed_scenario(
            Scenario {
                id: ScenarioId::from(1),
                tenant_id: TenantId::from(7),
                name: "greet".into(),
                schedule: None,
                raw_data: Value::map(),
            },
            vec![Trigger {
                id: TriggerId::from(1),
                scenario_id: ScenarioId::from(1),
                condition_expression: "$event_type == \"message\"".into(),
                raw_data: Value::map(),
            }],
            vec![],
            None,
        );

        let loader = ScenarioLoader::new(repo);
        let snapshot = loader.load_tenant_scenarios(TenantId::from(7)).await;

        assert!(snapshot.scenario_index.contains_key(&ScenarioId::from(1)));
        assert_eq!(snapshot.scenario_name_index.get("greet"), Some(&ScenarioId::from(1)));

        let event: Value = serde_json::from_str(r#"{"event_type": "message"}"#).unwrap();
        assert_eq!(snapshot.search_tree.search(&event), vec![1]);
    }

    #[tokio::test]
    async fn malformed_trigger_condition_is_skipped_not_fatal() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.seed_scenario(
            Scenario {
                id: ScenarioId::from(1),
                tenant_id: TenantId::from(7),
                name: "broken".into(),
                schedule: None,
                raw_data: Value::map(),
            },
            vec![Trigger {
                id: TriggerId::from(1),
                scenario_id: ScenarioId::from(1),
                condition_expression: "$a ===".into(),
                raw_data: Value::map(),
            }],
            vec![],
            None,
        );

        let loader = ScenarioLoader::new(repo);
        let snapshot = loader.load_tenant_scenarios(TenantId::from(7)).await;
        let entry = &snapshot.scenario_index[&ScenarioId::from(1)];
        assert!(entry.triggers.is_empty());
    }
}
