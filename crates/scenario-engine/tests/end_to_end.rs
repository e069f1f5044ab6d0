// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end coverage of the scenario engine's public surface, run through
//! [`ScenarioEngine::process_event`] against an [`InMemoryRepository`]
//! rather than the individual executor/transition/cache modules.

use scenario_core::{ActionResult, Envelope, ScenarioId, StepId, TenantId, TriggerId, Value};
use scenario_engine::{ActionBus, ScenarioEngine};
use scenario_store::{InMemoryRepository, Scenario, Step, Transition, Trigger};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn trigger(id: i64, scenario_id: i64, expr: &str) -> Trigger {
    Trigger {
        id: TriggerId::from(id),
        scenario_id: ScenarioId::from(scenario_id),
        condition_expression: expr.to_string(),
        raw_data: Value::map(),
    }
}

fn step(id: i64, scenario_id: i64, order: i64, action_name: &str, params: Value) -> Step {
    Step {
        id: StepId::from(id),
        scenario_id: ScenarioId::from(scenario_id),
        step_order: order,
        action_name: action_name.to_string(),
        params,
        is_async: false,
        action_id: None,
        raw_data: Value::map(),
    }
}

fn transition(action_result: &str, action: &str, value: Option<Value>) -> Transition {
    Transition { step_id: StepId::from(0), action_result: action_result.to_string(), action: action.to_string(), value }
}

/// *(2) Transition on action result* — `check_user` comes back `not_found`,
/// the transition jumps to the `register` scenario by name, and `register`'s
/// own single step runs instead of `greet`'s second step.
#[tokio::test]
async fn not_found_result_jumps_to_a_named_scenario() {
    let repo = Arc::new(InMemoryRepository::new());

    repo.seed_scenario(
        Scenario { id: ScenarioId::from(1), tenant_id: TenantId::from(1), name: "greet".into(), schedule: None, raw_data: Value::map() },
        vec![trigger(1, 1, "$event_type == \"message\"")],
        vec![
            (
                step(1, 1, 0, "check_user", Value::map()),
                vec![transition("not_found", "jump_to_scenario", Some(Value::String("register".into())))],
            ),
            (step(2, 1, 1, "never_run", Value::map()), vec![]),
        ],
        None,
    );
    repo.seed_scenario(
        Scenario { id: ScenarioId::from(2), tenant_id: TenantId::from(1), name: "register".into(), schedule: None, raw_data: Value::map() },
        vec![],
        vec![(step(3, 2, 0, "create_user", Value::map()), vec![])],
        None,
    );

    let never_run_calls = Arc::new(AtomicUsize::new(0));
    let create_user_calls = Arc::new(AtomicUsize::new(0));

    let mut bus = ActionBus::new();
    bus.register("check_user", Arc::new(|_: Value| Envelope {
        result: ActionResult::custom("not_found"),
        response_data: None,
        error: None,
    }));
    {
        let calls = never_run_calls.clone();
        bus.register("never_run", Arc::new(move |_: Value| {
            calls.fetch_add(1, Ordering::SeqCst);
            Envelope::success()
        }));
    }
    {
        let calls = create_user_calls.clone();
        bus.register("create_user", Arc::new(move |_: Value| {
            calls.fetch_add(1, Ordering::SeqCst);
            Envelope::success()
        }));
    }

    let engine = ScenarioEngine::new(repo, Arc::new(bus));
    let event: Value = serde_json::from_str(r#"{"system": {"tenant_id": 1}, "event_type": "message"}"#).unwrap();

    assert!(engine.process_event(&event).await);
    assert_eq!(never_run_calls.load(Ordering::SeqCst), 0, "greet's second step must not run after the jump");
    assert_eq!(create_user_calls.load(Ordering::SeqCst), 1, "register's step must run exactly once");
}

/// *(6) Snapshot isolation* — reloading a tenant mid-flight must not change
/// the scenario definition an in-flight `process_event` call is using; the
/// next event for that tenant is the one that sees the new snapshot.
#[tokio::test]
async fn reload_does_not_affect_a_snapshot_already_in_use() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.seed_scenario(
        Scenario { id: ScenarioId::from(1), tenant_id: TenantId::from(1), name: "v1".into(), schedule: None, raw_data: Value::map() },
        vec![trigger(1, 1, "$event_type == \"message\"")],
        vec![(step(1, 1, 0, "mark_v1", Value::map()), vec![])],
        None,
    );

    let v1_calls = Arc::new(AtomicUsize::new(0));
    let v2_calls = Arc::new(AtomicUsize::new(0));
    let mut bus = ActionBus::new();
    {
        let calls = v1_calls.clone();
        bus.register("mark_v1", Arc::new(move |_: Value| {
            calls.fetch_add(1, Ordering::SeqCst);
            Envelope::success()
        }));
    }
    {
        let calls = v2_calls.clone();
        bus.register("mark_v2", Arc::new(move |_: Value| {
            calls.fetch_add(1, Ordering::SeqCst);
            Envelope::success()
        }));
    }

    let engine = ScenarioEngine::new(repo.clone(), Arc::new(bus));
    let event: Value = serde_json::from_str(r#"{"system": {"tenant_id": 1}, "event_type": "message"}"#).unwrap();

    // First event populates and uses the v1 snapshot.
    assert!(engine.process_event(&event).await);
    assert_eq!(v1_calls.load(Ordering::SeqCst), 1);

    // Swap the tenant's only scenario for a "v2" before the next event.
    repo.seed_scenario(
        Scenario { id: ScenarioId::from(1), tenant_id: TenantId::from(1), name: "v2".into(), schedule: None, raw_data: Value::map() },
        vec![trigger(1, 1, "$event_type == \"message\"")],
        vec![(step(2, 1, 0, "mark_v2", Value::map()), vec![])],
        None,
    );
    engine.reload_tenant_scenarios(TenantId::from(1)).await;

    assert!(engine.process_event(&event).await);
    assert_eq!(v1_calls.load(Ordering::SeqCst), 1, "v1's step must not run again after the reload");
    assert_eq!(v2_calls.load(Ordering::SeqCst), 1, "the next event must observe the reloaded snapshot");
}
