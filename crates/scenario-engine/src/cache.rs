// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tenant scenario cache (§4.E). A snapshot is swapped in wholesale on
//! reload; everything inside it — the search tree, the id index, the name
//! index — is read-only for the lifetime of the `Arc`, which is what lets a
//! scenario execution in flight keep using its own snapshot untouched by a
//! concurrent reload (I5).

use indexmap::IndexMap;
use parking_lot::RwLock;
use scenario_condition::CompiledCondition;
use scenario_core::{BotId, ScenarioId, TenantId, Value};
use scenario_store::{Step, Transition, Trigger};
use std::collections::HashMap;
use std::sync::Arc;

pub struct CompiledTrigger {
    pub trigger: Trigger,
    pub condition: CompiledCondition,
}

pub struct ScenarioEntry {
    pub id: ScenarioId,
    pub name: String,
    pub raw_data: Value,
    pub triggers: Vec<CompiledTrigger>,
    pub steps: Vec<(Step, Vec<Transition>)>,
}

/// The read-only snapshot shared across every event processed for a
/// tenant between two reloads.
#[derive(Default)]
pub struct TenantSnapshot {
    pub search_tree: scenario_condition::SearchTree,
    pub scenario_index: HashMap<ScenarioId, ScenarioEntry>,
    pub scenario_name_index: IndexMap<String, ScenarioId>,
}

impl TenantSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Holds one [`TenantSnapshot`] per tenant behind an `Arc`, so a reader can
/// clone the `Arc` once and keep using that exact snapshot even if another
/// task reloads the tenant mid-execution.
#[derive(Default)]
pub struct ScenarioCache {
    snapshots: RwLock<HashMap<TenantId, Arc<TenantSnapshot>>>,
    bot_ids: RwLock<HashMap<TenantId, BotId>>,
}

impl ScenarioCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `tenant:{id}:bot_id` KV-cache entry (§4.L, §6); `None` on a cache miss.
    pub fn bot_id(&self, tenant_id: TenantId) -> Option<BotId> {
        self.bot_ids.read().get(&tenant_id).copied()
    }

    pub fn set_bot_id(&self, tenant_id: TenantId, bot_id: BotId) {
        self.bot_ids.write().insert(tenant_id, bot_id);
    }

    pub fn has_tenant(&self, tenant_id: TenantId) -> bool {
        self.snapshots.read().contains_key(&tenant_id)
    }

    /// Returns the tenant's current snapshot by reference-counted handle —
    /// safe to hold across an `await` point; a concurrent `set` only
    /// affects subsequent lookups, never this handle.
    pub fn get(&self, tenant_id: TenantId) -> Option<Arc<TenantSnapshot>> {
        self.snapshots.read().get(&tenant_id).cloned()
    }

    pub fn set(&self, tenant_id: TenantId, snapshot: TenantSnapshot) {
        self.snapshots.write().insert(tenant_id, Arc::new(snapshot));
    }

    pub fn invalidate(&self, tenant_id: TenantId) {
        self.snapshots.write().remove(&tenant_id);
    }

    pub fn clear(&self) {
        self.snapshots.write().clear();
    }
}
