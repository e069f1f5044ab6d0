// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scenario engine facade (§4.M): wires the cache, loader, finder, and
//! executor together behind a single `process_event` entry point, and doubles
//! as the [`ScheduledRunner`] the scheduler calls back into.

use crate::action::ActionBus;
use crate::cache::{ScenarioCache, TenantSnapshot};
use crate::executor::ScenarioExecutor;
use crate::finder;
use crate::loader::ScenarioLoader;
use crate::pending::PendingActions;
use crate::scheduler::{ScheduledRunner, Scheduler};
use crate::step_executor::StepExecutor;
use crate::sync::{sync_scenarios, ScenarioSync, SyncError};
use async_trait::async_trait;
use indexmap::IndexMap;
use scenario_core::{ActionError, BotId, Clock, Envelope, ScenarioId, SystemClock, TenantId, Value};
use scenario_placeholder::PlaceholderProcessor;
use scenario_store::ScenarioRepository;
use std::sync::Arc;

pub struct ScenarioEngine {
    cache: Arc<ScenarioCache>,
    loader: ScenarioLoader,
    repository: Arc<dyn ScenarioRepository>,
    executor: ScenarioExecutor,
}

impl ScenarioEngine {
    pub fn new(repository: Arc<dyn ScenarioRepository>, actions: Arc<ActionBus>) -> Arc<Self> {
        Self::with_max_nesting_depth(repository, actions, 10)
    }

    pub fn with_max_nesting_depth(
        repository: Arc<dyn ScenarioRepository>,
        actions: Arc<ActionBus>,
        max_nesting_depth: u32,
    ) -> Arc<Self> {
        let loader = ScenarioLoader::new(repository.clone());
        let placeholders = Arc::new(PlaceholderProcessor::new(max_nesting_depth));
        let step_executor = Arc::new(StepExecutor::new(actions, placeholders));
        let executor = ScenarioExecutor::new(step_executor);

        Arc::new(Self {
            cache: Arc::new(ScenarioCache::new()),
            loader,
            repository,
            executor,
        })
    }

    /// Builds and runs a background [`Scheduler`] wired back to this engine.
    /// Returns the scheduler handle (for `shutdown()`) and its join handle.
    pub fn start_scheduler(self: &Arc<Self>) -> (Arc<Scheduler>, tokio::task::JoinHandle<()>) {
        let scheduler = Arc::new(Scheduler::new(self.repository.clone(), self.clone() as Arc<dyn ScheduledRunner>));
        let join = scheduler.run();
        (scheduler, join)
    }

    /// Matches `event` against its tenant's scenarios and runs every hit in
    /// turn. `stop` ends processing early and returns `true`; `abort`,
    /// `break`, and `error` move on to the next matched scenario. Returns
    /// `false` only when the event carries no usable tenant id at all.
    pub async fn process_event(&self, event: &Value) -> bool {
        let Some(tenant_id) = finder::extract_tenant_id(event) else {
            tracing::warn!("event has no resolvable tenant id, dropping");
            return false;
        };

        let snapshot = self.snapshot_for(tenant_id).await;
        let scenario_ids = finder::find_scenarios_by_event(event, &snapshot);

        for scenario_id in scenario_ids {
            let Some(entry) = snapshot.scenario_index.get(&scenario_id) else {
                continue;
            };
            let pending = PendingActions::new();
            let (result, _cache) =
                self.executor.execute_scenario(entry, event.clone(), &snapshot, &pending, &[]).await;

            match result.as_str() {
                "stop" => return true,
                "abort" | "break" => {
                    tracing::debug!(scenario_id = scenario_id.0, result = %result, "scenario ended without stopping event processing");
                }
                "error" => {
                    tracing::warn!(scenario_id = scenario_id.0, "scenario run errored, continuing to the next matched scenario");
                }
                _ => {}
            }
        }

        true
    }

    pub async fn reload_tenant_scenarios(&self, tenant_id: TenantId) {
        let snapshot = self.loader.load_tenant_scenarios(tenant_id).await;
        self.cache.set(tenant_id, snapshot);
    }

    pub fn cleanup(&self) {
        self.cache.clear();
    }

    /// `sync_scenarios` (§1 EXPANSION): the only mutation path into the
    /// store, delete-then-insert-then-reload. Delegates persistence to
    /// [`crate::sync::sync_scenarios`] and refreshes the tenant's cached
    /// snapshot once the write lands.
    pub async fn sync_scenarios(&self, tenant_id: TenantId, scenarios: Vec<ScenarioSync>) -> Result<(), SyncError> {
        sync_scenarios(self.repository.as_ref(), tenant_id, scenarios).await?;
        self.reload_tenant_scenarios(tenant_id).await;
        Ok(())
    }

    /// Exposes scenario execution as an invocable action (§1 EXPANSION): the
    /// original lets `scenario_processor.execute_scenario` be called the
    /// same way any other action is. `ActionBus`'s registry is only mutable
    /// before it's frozen into an `Arc`, so the engine can't literally
    /// insert itself into its own bus; a caller that wants this symmetry
    /// registers a closure that forwards into this method instead, e.g.
    /// `bus.register("execute_scenario", Arc::new(move |data| { ... }))`.
    ///
    /// Expects `{scenario_name, system: {tenant_id}, data?}`; `data` defaults
    /// to the action payload itself when absent.
    pub async fn execute_scenario_action(self: &Arc<Self>, action_data: Value) -> Envelope {
        let Some(scenario_name) = action_data.as_map().and_then(|m| m.get("scenario_name")).and_then(|v| v.as_str())
        else {
            return Envelope::error(ActionError::validation("execute_scenario requires a scenario_name"));
        };
        let Some(tenant_id) = finder::extract_tenant_id(&action_data) else {
            return Envelope::error(ActionError::validation("execute_scenario requires a resolvable system.tenant_id"));
        };
        let data = action_data
            .as_map()
            .and_then(|m| m.get("data"))
            .cloned()
            .unwrap_or_else(|| action_data.clone());

        let snapshot = self.snapshot_for(tenant_id).await;
        let pending = PendingActions::new();
        let (result, cache) =
            self.executor.execute_scenario_by_name(scenario_name, data, &snapshot, &pending, &[]).await;

        let mut response = IndexMap::new();
        response.insert("scenario_result".to_string(), Value::String(result));
        response.insert("cache".to_string(), cache);
        Envelope::success_with(response)
    }

    /// `process_scenario_event` (§1 EXPANSION): the action-bus-addressable
    /// form of [`Self::process_event`] — same matching and dispatch, wrapped
    /// as an envelope instead of a bare bool so it, too, can be registered
    /// into an `ActionBus`.
    pub async fn process_scenario_event_action(self: &Arc<Self>, event: Value) -> Envelope {
        let matched = self.process_event(&event).await;
        let mut response = IndexMap::new();
        response.insert("matched".to_string(), Value::Bool(matched));
        Envelope::success_with(response)
    }

    async fn snapshot_for(&self, tenant_id: TenantId) -> Arc<TenantSnapshot> {
        if let Some(snapshot) = self.cache.get(tenant_id) {
            return snapshot;
        }
        let snapshot = self.loader.load_tenant_scenarios(tenant_id).await;
        self.cache.set(tenant_id, snapshot);
        self.cache.get(tenant_id).unwrap_or_else(|| Arc::new(TenantSnapshot::default()))
    }
}

#[async_trait]
impl ScheduledRunner for ScenarioEngine {
    async fn run_scheduled_scenario(
        &self,
        tenant_id: TenantId,
        scenario_id: ScenarioId,
        scenario_name: &str,
        scheduled_at: chrono::DateTime<chrono::Local>,
    ) {
        let snapshot = self.snapshot_for(tenant_id).await;
        let Some(entry) = snapshot.scenario_index.get(&scenario_id) else {
            tracing::warn!(scenario_id = scenario_id.0, "scheduled scenario not present in current snapshot");
            return;
        };

        let bot_id = self.bot_id_for(tenant_id).await;
        let config = match self.repository.get_tenant_config(tenant_id).await {
            Ok(config) => config.map(|c| c.config),
            Err(error) => {
                tracing::warn!(tenant_id = tenant_id.0, %error, "failed to load tenant config for scheduled run");
                None
            }
        };

        let event = scheduled_event(tenant_id, scenario_id, scenario_name, scheduled_at, bot_id, config);
        let pending = PendingActions::new();
        self.executor.execute_scenario(entry, event, &snapshot, &pending, &[]).await;
    }
}

/// §4.L's "Resolve `bot_id` for the tenant" step: `tenant:{tid}:bot_id`
/// cache-or-repository fallback, populating the cache on a miss.
impl ScenarioEngine {
    async fn bot_id_for(&self, tenant_id: TenantId) -> Option<BotId> {
        if let Some(bot_id) = self.cache.bot_id(tenant_id) {
            return Some(bot_id);
        }
        match self.repository.get_bot_by_tenant_id(tenant_id).await {
            Ok(Some(bot)) => {
                self.cache.set_bot_id(tenant_id, bot.id);
                Some(bot.id)
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(tenant_id = tenant_id.0, %error, "failed to resolve bot_id for scheduled run");
                None
            }
        }
    }
}

fn scheduled_event(
    tenant_id: TenantId,
    scenario_id: ScenarioId,
    scenario_name: &str,
    scheduled_at: chrono::DateTime<chrono::Local>,
    bot_id: Option<BotId>,
    config: Option<Value>,
) -> Value {
    let mut system = IndexMap::new();
    system.insert("tenant_id".to_string(), Value::int(tenant_id.0));
    system.insert("trigger".to_string(), Value::String("scheduled".to_string()));
    system.insert("scenario_name".to_string(), Value::String(scenario_name.to_string()));

    let mut root = IndexMap::new();
    root.insert("system".to_string(), Value::Map(system));
    if let Some(bot_id) = bot_id {
        root.insert("bot_id".to_string(), Value::int(bot_id.0));
    }
    root.insert("scheduled_at".to_string(), Value::String(SystemClock.to_iso_local_string(scheduled_at)));
    root.insert("scheduled_scenario_id".to_string(), Value::int(scenario_id.0));
    if let Some(config) = config {
        root.insert("_config".to_string(), config);
    }
    Value::Map(root)
}
