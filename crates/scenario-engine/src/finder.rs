// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario finder (§4.G): pulls the tenant id out of an event and narrows
//! the tenant's search tree down to scenario ids whose trigger matched.

use crate::cache::TenantSnapshot;
use scenario_core::{ScenarioId, TenantId, Value};

/// `event.system.tenant_id` must exist and be an integer — a string `"1"`
/// is rejected, not coerced, matching the strict extraction the engine
/// facade relies on to decide whether an event can be processed at all.
pub fn extract_tenant_id(event: &Value) -> Option<TenantId> {
    let system = event.as_map()?.get("system")?.as_map()?;
    let tenant_id = system.get("tenant_id")?.as_i64()?;
    Some(TenantId::from(tenant_id))
}

/// Matches `event` against the tenant's search tree, then filters out any
/// scenario id the tree knows about but the index no longer carries — the
/// tolerated race window between a reload dropping a scenario and the tree
/// still holding a stale reference to it (I2).
pub fn find_scenarios_by_event(event: &Value, snapshot: &TenantSnapshot) -> Vec<ScenarioId> {
    snapshot
        .search_tree
        .search(event)
        .into_iter()
        .map(ScenarioId::from)
        .filter(|id| {
            let present = snapshot.scenario_index.contains_key(id);
            if !present {
                tracing::warn!(scenario_id = id.0, "search tree referenced a scenario no longer indexed");
            }
            present
        })
        .collect()
}
