// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario executor (§4.K): walks a scenario's steps in order, feeding each
//! step's result through the transition table to decide what happens next.
//! The loop is expressed as an explicit index rather than an iterator since
//! `move_steps`/`jump_to_step` can move it forwards, backwards, or end the
//! scenario outright.

use crate::cache::{ScenarioEntry, TenantSnapshot};
use crate::cache_merge;
use crate::pending::PendingActions;
use crate::step_executor::StepExecutor;
use crate::transition::{self, JumpTarget, StepControl};
use scenario_core::{ScenarioId, Value};
use std::sync::Arc;

pub struct ScenarioExecutor {
    step_executor: Arc<StepExecutor>,
}

impl ScenarioExecutor {
    pub fn new(step_executor: Arc<StepExecutor>) -> Self {
        Self { step_executor }
    }

    /// Runs one scenario to completion, returning the terminal action
    /// (`success`/`stop`/`abort`/`break`/`error`) and whatever accumulated
    /// under `data._cache` along the way.
    pub async fn execute_scenario(
        &self,
        entry: &ScenarioEntry,
        data: Value,
        snapshot: &TenantSnapshot,
        pending: &PendingActions,
        scenario_chain: &[ScenarioId],
    ) -> (String, Value) {
        let mut chain = scenario_chain.to_vec();
        chain.push(entry.id);
        let mut data = data.deep_merge(&chain_overlay(&chain));

        let steps = &entry.steps;
        let mut i: usize = 0;

        while i < steps.len() {
            let (step, transitions) = &steps[i];
            let envelope = self.step_executor.execute_step(step, &data, pending).await;

            if let Some(response_data) = &envelope.response_data {
                let replaceable_field = self.step_executor.replaceable_field(&step.action_name);
                data = cache_merge::merge_response_data(&data, response_data, &step.params, replaceable_field.as_deref());
            }

            if let Some(scenario_result) = envelope.scenario_result() {
                match scenario_result {
                    "abort" => return ("abort".to_string(), cache_merge::extract_cache(&data)),
                    "stop" => return ("stop".to_string(), cache_merge::extract_cache(&data)),
                    _ => {}
                }
            }

            let resolved = transition::resolve_transition(envelope.result.as_str(), transitions);

            match transition::step_control(&resolved, i, steps.len()) {
                StepControl::Continue => i += 1,
                StepControl::MoveTo(next) => i = next,
                StepControl::TerminateSuccess => return ("success".to_string(), cache_merge::extract_cache(&data)),
                StepControl::Stop => return ("stop".to_string(), cache_merge::extract_cache(&data)),
                StepControl::Abort => return ("abort".to_string(), cache_merge::extract_cache(&data)),
                StepControl::Break => return ("break".to_string(), cache_merge::extract_cache(&data)),
                StepControl::JumpToScenario(target) => {
                    return self.execute_jump(target, data, snapshot, pending, &chain).await;
                }
            }
        }

        ("success".to_string(), cache_merge::extract_cache(&data))
    }

    /// Looks a scenario up by name and delegates to [`Self::execute_scenario`],
    /// copying `data` first so the caller's state is untouched if the named
    /// scenario doesn't exist.
    pub async fn execute_scenario_by_name(
        &self,
        name: &str,
        data: Value,
        snapshot: &TenantSnapshot,
        pending: &PendingActions,
        scenario_chain: &[ScenarioId],
    ) -> (String, Value) {
        match snapshot
            .scenario_name_index
            .get(name)
            .and_then(|id| snapshot.scenario_index.get(id))
        {
            Some(entry) => {
                Box::pin(self.execute_scenario(entry, data, snapshot, pending, scenario_chain)).await
            }
            None => {
                tracing::warn!(scenario_name = name, "jump_to_scenario target not found");
                ("error".to_string(), cache_merge::extract_cache(&data))
            }
        }
    }

    async fn execute_jump(
        &self,
        target: JumpTarget,
        data: Value,
        snapshot: &TenantSnapshot,
        pending: &PendingActions,
        scenario_chain: &[ScenarioId],
    ) -> (String, Value) {
        match target {
            JumpTarget::None => ("success".to_string(), cache_merge::extract_cache(&data)),
            JumpTarget::Name(name) => {
                self.execute_scenario_by_name(&name, data, snapshot, pending, scenario_chain).await
            }
            JumpTarget::Names(names) => {
                let mut last = ("success".to_string(), cache_merge::extract_cache(&data));
                for name in names {
                    last = self
                        .execute_scenario_by_name(&name, data.clone(), snapshot, pending, scenario_chain)
                        .await;
                    if last.0 == "abort" {
                        return last;
                    }
                }
                last
            }
        }
    }
}

fn chain_overlay(chain: &[ScenarioId]) -> Value {
    let mut overlay = indexmap::IndexMap::new();
    overlay.insert(
        "_scenario_chain".to_string(),
        Value::List(chain.iter().map(|id| Value::int(id.0)).collect()),
    );
    Value::Map(overlay)
}
