// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled-scenario ticker (§4.L): polls every `scheduled_scenarios` row on
//! a one-minute cadence and fires any scenario whose cron expression is due,
//! using the `cron` crate in place of a hand-rolled cron parser.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, Timelike};
use cron::Schedule;
use parking_lot::Mutex;
use scenario_core::{ScenarioId, TenantId};
use scenario_store::ScenarioRepository;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Notify;

/// Executes one scheduled scenario firing. Implemented by the engine facade
/// so the scheduler itself doesn't need to know how to build the synthetic
/// event or run it through the executor.
#[async_trait]
pub trait ScheduledRunner: Send + Sync {
    async fn run_scheduled_scenario(
        &self,
        tenant_id: TenantId,
        scenario_id: ScenarioId,
        scenario_name: &str,
        scheduled_at: chrono::DateTime<Local>,
    );
}

struct ScheduledMetadata {
    tenant_id: TenantId,
    scenario_name: String,
    schedule: Schedule,
    next_run: chrono::DateTime<Local>,
    is_running: bool,
}

pub struct Scheduler {
    repository: Arc<dyn ScenarioRepository>,
    runner: Arc<dyn ScheduledRunner>,
    metadata: Mutex<HashMap<ScenarioId, ScheduledMetadata>>,
    shutdown: Arc<Notify>,
}

impl Scheduler {
    pub fn new(repository: Arc<dyn ScenarioRepository>, runner: Arc<dyn ScheduledRunner>) -> Self {
        Self {
            repository,
            runner,
            metadata: Mutex::new(HashMap::new()),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Loads every tenant's scheduled scenarios at startup.
    pub async fn load_all_scheduled_scenarios(&self) {
        self.load_scheduled(None).await;
    }

    /// Re-reads one tenant's scheduled scenarios, replacing whatever
    /// metadata the scheduler previously held for that tenant.
    pub async fn reload_scheduled_metadata(&self, tenant_id: TenantId) {
        self.metadata.lock().retain(|_, meta| meta.tenant_id != tenant_id);
        self.load_scheduled(Some(tenant_id)).await;
    }

    async fn load_scheduled(&self, tenant_id: Option<TenantId>) {
        let rows = match self.repository.get_scheduled_scenarios(tenant_id).await {
            Ok(rows) => rows,
            Err(error) => {
                tracing::warn!(%error, "failed to load scheduled scenarios");
                return;
            }
        };

        let now = Local::now();
        for row in rows {
            let cron_expr = normalize_cron(&row.cron);
            let schedule = match Schedule::from_str(&cron_expr) {
                Ok(schedule) => schedule,
                Err(error) => {
                    tracing::warn!(scenario_id = row.scenario_id.0, %error, "unparseable cron expression, skipping");
                    continue;
                }
            };
            let next_run = schedule.after(&now).next().unwrap_or(now);
            self.metadata.lock().insert(
                row.scenario_id,
                ScheduledMetadata {
                    tenant_id: row.tenant_id,
                    scenario_name: row.scenario_name,
                    schedule,
                    next_run,
                    is_running: false,
                },
            );
        }
    }

    /// Spawns the background ticker. Returns the join handle so the caller
    /// can await it on shutdown if it wants to.
    pub fn run(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(duration_until_next_minute()) => {
                        scheduler.check_scheduled_scenarios().await;
                    }
                    _ = scheduler.shutdown.notified() => break,
                }
            }
        })
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Finds every due, not-already-running scenario and fires it in its
    /// own task — one stuck scenario never blocks the next tick.
    pub async fn check_scheduled_scenarios(&self) {
        let now = Local::now().with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or_else(Local::now);

        let due: Vec<ScenarioId> = {
            let metadata = self.metadata.lock();
            metadata
                .iter()
                .filter(|(_, meta)| !meta.is_running && meta.next_run <= now)
                .map(|(id, _)| *id)
                .collect()
        };

        for scenario_id in due {
            {
                let mut metadata = self.metadata.lock();
                match metadata.get_mut(&scenario_id) {
                    Some(meta) if !meta.is_running => meta.is_running = true,
                    _ => continue,
                }
            }
            self.run_scheduled_scenario(scenario_id).await;
        }
    }

    async fn run_scheduled_scenario(&self, scenario_id: ScenarioId) {
        let (tenant_id, scenario_name, scheduled_at) = {
            let metadata = self.metadata.lock();
            match metadata.get(&scenario_id) {
                Some(meta) => (meta.tenant_id, meta.scenario_name.clone(), meta.next_run),
                None => return,
            }
        };

        self.runner.run_scheduled_scenario(tenant_id, scenario_id, &scenario_name, scheduled_at).await;

        let completed_at = Local::now();
        if let Err(error) = self.repository.update_scenario_last_run(scenario_id, completed_at).await {
            tracing::warn!(scenario_id = scenario_id.0, %error, "failed to record scheduled scenario last_run");
        }

        let mut metadata = self.metadata.lock();
        if let Some(meta) = metadata.get_mut(&scenario_id) {
            meta.is_running = false;
            meta.next_run = meta.schedule.after(&completed_at).next().unwrap_or(completed_at + ChronoDuration::minutes(1));
        }
    }
}

fn duration_until_next_minute() -> std::time::Duration {
    let now = Local::now();
    let seconds_into_minute = now.second() as u64;
    let millis_into_second = now.timestamp_subsec_millis() as u64;
    let elapsed_millis = seconds_into_minute * 1000 + millis_into_second;
    let remaining = 60_000u64.saturating_sub(elapsed_millis);
    std::time::Duration::from_millis(remaining.max(1))
}

/// The `cron` crate expects a leading seconds field; scenario cron strings
/// are the conventional 5-field form, so a bare `0 ` is prepended when the
/// caller's expression only has 5 fields.
fn normalize_cron(expr: &str) -> String {
    let fields = expr.split_whitespace().count();
    if fields == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    }
}

/// Validates a cron expression without scheduling anything — used by
/// `sync_scenarios` (§1 EXPANSION) to reject a bad `schedule` field before
/// it's persisted.
pub(crate) fn validate_cron(expr: &str) -> Result<(), String> {
    Schedule::from_str(&normalize_cron(expr)).map(|_| ()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::Value;
    use scenario_store::{InMemoryRepository, ScheduledScenario};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRunner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ScheduledRunner for CountingRunner {
        async fn run_scheduled_scenario(
            &self,
            _tenant_id: TenantId,
            _scenario_id: ScenarioId,
            _scenario_name: &str,
            _scheduled_at: chrono::DateTime<Local>,
        ) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn normalize_cron_prepends_seconds_field() {
        assert_eq!(normalize_cron("*/5 * * * *"), "0 */5 * * * *");
        assert_eq!(normalize_cron("0 */5 * * * *"), "0 */5 * * * *");
    }

    #[tokio::test]
    async fn due_scenario_is_run_and_last_run_updated() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.seed_scenario(
            scenario_store::Scenario {
                id: ScenarioId::from(1),
                tenant_id: TenantId::from(1),
                name: "daily".into(),
                schedule: Some("* * * * *".into()),
                raw_data: Value::map(),
            },
            vec![],
            vec![],
            Some(ScheduledScenario {
                scenario_id: ScenarioId::from(1),
                tenant_id: TenantId::from(1),
                scenario_name: "daily".into(),
                cron: "* * * * *".into(),
                last_run: None,
            }),
        );

        let runner = Arc::new(CountingRunner { calls: AtomicUsize::new(0) });
        let scheduler = Scheduler::new(repo.clone(), runner.clone());
        scheduler.load_all_scheduled_scenarios().await;
        scheduler.check_scheduled_scenarios().await;

        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
        assert!(scheduler.metadata.lock().get(&ScenarioId::from(1)).unwrap().next_run > Local::now());
    }

    #[tokio::test]
    async fn already_running_scenario_is_skipped_on_the_next_tick() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.seed_scenario(
            scenario_store::Scenario {
                id: ScenarioId::from(1),
                tenant_id: TenantId::from(1),
                name: "daily".into(),
                schedule: Some("* * * * *".into()),
                raw_data: Value::map(),
            },
            vec![],
            vec![],
            Some(ScheduledScenario {
                scenario_id: ScenarioId::from(1),
                tenant_id: TenantId::from(1),
                scenario_name: "daily".into(),
                cron: "* * * * *".into(),
                last_run: None,
            }),
        );

        let runner = Arc::new(CountingRunner { calls: AtomicUsize::new(0) });
        let scheduler = Scheduler::new(repo, runner);
        scheduler.load_all_scheduled_scenarios().await;
        scheduler.metadata.lock().get_mut(&ScenarioId::from(1)).unwrap().is_running = true;

        scheduler.check_scheduled_scenarios().await;
        assert!(scheduler.metadata.lock().get(&ScenarioId::from(1)).unwrap().is_running);
    }
}
