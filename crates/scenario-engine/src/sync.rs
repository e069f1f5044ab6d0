// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sync_scenarios` (§1 EXPANSION): the original's only mutation path into
//! the store — a tenant-scoped delete-then-insert-then-reload, validating
//! every scenario's `schedule` field as a real cron expression before
//! anything is persisted.

use scenario_core::TenantId;
use scenario_store::{ScenarioRepository, Scenario, Step, StoreError, Transition, Trigger};

pub struct ScenarioSync {
    pub scenario: Scenario,
    pub triggers: Vec<Trigger>,
    pub steps: Vec<(Step, Vec<Transition>)>,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid cron expression '{0}': {1}")]
    InvalidCron(String, String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Replaces every scenario a tenant has with `scenarios`. Validates all
/// cron expressions first so a bad schedule never leaves the tenant with a
/// half-applied sync (an invalid cron aborts before the delete happens).
pub async fn sync_scenarios(
    repository: &dyn ScenarioRepository,
    tenant_id: TenantId,
    scenarios: Vec<ScenarioSync>,
) -> Result<(), SyncError> {
    for sync in &scenarios {
        if let Some(schedule) = &sync.scenario.schedule {
            crate::scheduler::validate_cron(schedule)
                .map_err(|message| SyncError::InvalidCron(schedule.clone(), message))?;
        }
    }

    repository.delete_scenarios_by_tenant(tenant_id).await?;
    for sync in scenarios {
        repository.save_scenario(sync.scenario, sync.triggers, sync.steps).await?;
    }

    Ok(())
}
