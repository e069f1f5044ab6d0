// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step executor (§4.H): resolves a step's params against the current data,
//! merges the result into the outgoing action call, dispatches through the
//! [`ActionBus`], and normalizes whatever comes back into an [`Envelope`].

use crate::action::ActionBus;
use crate::pending::PendingActions;
use scenario_core::{ActionError, ActionResult, Envelope, ErrorCode, Value};
use scenario_placeholder::PlaceholderProcessor;
use scenario_store::Step;
use std::time::Duration;

/// Pseudo action name intercepted by the step executor itself rather than
/// dispatched through the [`ActionBus`] (§5's "suspension points" — a
/// `wait_for_action` step is a channel receive, not a registered action).
const WAIT_FOR_ACTION: &str = "wait_for_action";

pub struct StepExecutor {
    actions: std::sync::Arc<ActionBus>,
    placeholders: std::sync::Arc<PlaceholderProcessor>,
}

impl StepExecutor {
    pub fn new(actions: std::sync::Arc<ActionBus>, placeholders: std::sync::Arc<PlaceholderProcessor>) -> Self {
        Self { actions, placeholders }
    }

    /// The response field `action_name`'s output schema marks `replaceable`,
    /// if any (§4.J's `_response_key` substitution target).
    pub fn replaceable_field(&self, action_name: &str) -> Option<String> {
        self.actions.replaceable_field(action_name).map(str::to_string)
    }

    /// Builds the outgoing action payload and dispatches it. `data` is the
    /// scenario's running state; `pending` tracks in-flight async handles
    /// for this scenario run so a later step can await one.
    pub async fn execute_step(&self, step: &Step, data: &Value, pending: &PendingActions) -> Envelope {
        if step.action_name.trim().is_empty() {
            return Envelope::error(ActionError::validation("step has no action_name"));
        }

        if step.action_name == WAIT_FOR_ACTION {
            return self.wait_for_action(step, data, pending).await;
        }

        let action_data = self.build_action_data(step, data);

        if step.is_async {
            let Some(action_id) = step.action_id.as_deref().filter(|id| !id.trim().is_empty()) else {
                return Envelope::error(ActionError::validation(
                    "async step requires an action_id",
                ));
            };

            return match self.actions.execute_fire_and_forget(&step.action_name, action_data) {
                Some(handle) => {
                    pending.insert(action_id.to_string(), handle);
                    Envelope::success_with(crate::action::async_action_marker(action_id))
                }
                None => Envelope::error(ActionError::new(
                    ErrorCode::NotFound,
                    format!("no action registered under '{}'", step.action_name),
                )),
            };
        }

        self.actions.execute(&step.action_name, action_data).await
    }

    /// `wait_for_action` (§4.H, §5): suspends on the one-shot handle a prior
    /// async step registered under `action_id`, with an optional
    /// `timeout_ms` that resolves to a `{result: "timeout"}` envelope
    /// without cancelling the underlying action.
    async fn wait_for_action(&self, step: &Step, data: &Value, pending: &PendingActions) -> Envelope {
        let params = self.placeholders.process_full(&step.params, data);
        let Some(action_id) = params.as_map().and_then(|m| m.get("action_id")).and_then(|v| v.as_str()) else {
            return Envelope::error(ActionError::validation("wait_for_action requires an action_id"));
        };

        let Some(handle) = pending.take(action_id) else {
            return Envelope::error(ActionError::new(
                ErrorCode::NotFound,
                format!("no pending action registered under '{action_id}'"),
            ));
        };

        let timeout_ms = params.as_map().and_then(|m| m.get("timeout_ms")).and_then(|v| v.as_i64());
        match timeout_ms {
            Some(ms) => match tokio::time::timeout(Duration::from_millis(ms.max(0) as u64), handle.wait()).await {
                Ok(envelope) => envelope,
                Err(_) => Envelope {
                    result: ActionResult::Timeout,
                    response_data: None,
                    error: None,
                },
            },
            None => handle.wait().await,
        }
    }

    /// `data` merged under the step's processed params, with `data.system`
    /// restored afterward so a step's params can never overwrite it.
    fn build_action_data(&self, step: &Step, data: &Value) -> Value {
        let processed_params = self.placeholders.process_full(&step.params, data);
        let mut merged = data.deep_merge(&processed_params);

        if let Some(system) = data.as_map().and_then(|m| m.get("system")) {
            if let Some(map) = merged.as_map_mut() {
                map.insert("system".to_string(), system.clone());
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{ActionResult, ScenarioId, StepId};
    use std::sync::Arc;

    fn step(action_name: &str, params: Value) -> Step {
        Step {
            id: StepId::from(1),
            scenario_id: ScenarioId::from(1),
            step_order: 0,
            action_name: action_name.to_string(),
            params,
            is_async: false,
            action_id: None,
            raw_data: Value::map(),
        }
    }

    fn executor_with(bus: ActionBus) -> StepExecutor {
        StepExecutor::new(Arc::new(bus), Arc::new(PlaceholderProcessor::new(10)))
    }

    #[tokio::test]
    async fn processed_params_are_merged_into_action_data() {
        let mut bus = ActionBus::new();
        bus.register(
            "send",
            Arc::new(|data: Value| {
                let mut out = indexmap::IndexMap::new();
                out.insert("seen_text".to_string(), data.as_map().unwrap().get("text").unwrap().clone());
                Envelope::success_with(out)
            }),
        );
        let executor = executor_with(bus);

        let params: Value = serde_json::from_str(r#"{"text": "hello {user.name}"}"#).unwrap();
        let data: Value = serde_json::from_str(r#"{"user": {"name": "Ada"}}"#).unwrap();
        let pending = PendingActions::new();

        let envelope = executor.execute_step(&step("send", params), &data, &pending).await;
        assert_eq!(
            envelope.response_data.unwrap().get("seen_text"),
            Some(&Value::String("hello Ada".to_string()))
        );
    }

    #[tokio::test]
    async fn system_block_is_restored_verbatim_after_param_merge() {
        let mut bus = ActionBus::new();
        bus.register(
            "echo",
            Arc::new(|data: Value| {
                let mut out = indexmap::IndexMap::new();
                out.insert("system".to_string(), data.as_map().unwrap().get("system").unwrap().clone());
                Envelope::success_with(out)
            }),
        );
        let executor = executor_with(bus);

        let params: Value = serde_json::from_str(r#"{"system": "overwritten"}"#).unwrap();
        let data: Value = serde_json::from_str(r#"{"system": {"tenant_id": 7}}"#).unwrap();
        let pending = PendingActions::new();

        let envelope = executor.execute_step(&step("echo", params), &data, &pending).await;
        let response = envelope.response_data.unwrap();
        assert_eq!(response.get("system").unwrap().as_map().unwrap().get("tenant_id"), Some(&Value::int(7)));
    }

    #[tokio::test]
    async fn missing_action_name_is_a_validation_error() {
        let executor = executor_with(ActionBus::new());
        let pending = PendingActions::new();
        let envelope = executor.execute_step(&step("", Value::map()), &Value::map(), &pending).await;
        assert_eq!(envelope.error.unwrap().code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn async_step_without_action_id_is_a_validation_error() {
        let mut bus = ActionBus::new();
        bus.register("noop", Arc::new(|_: Value| Envelope::success()));
        let executor = executor_with(bus);

        let mut s = step("noop", Value::map());
        s.is_async = true;
        let pending = PendingActions::new();

        let envelope = executor.execute_step(&s, &Value::map(), &pending).await;
        assert_eq!(envelope.error.unwrap().code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn async_step_registers_a_pending_handle_and_returns_marker() {
        let mut bus = ActionBus::new();
        bus.register("noop", Arc::new(|_: Value| Envelope::success()));
        let executor = executor_with(bus);

        let mut s = step("noop", Value::map());
        s.is_async = true;
        s.action_id = Some("job-1".to_string());
        let pending = PendingActions::new();

        let envelope = executor.execute_step(&s, &Value::map(), &pending).await;
        assert_eq!(envelope.result, ActionResult::Success);
        let marker = envelope.response_data.unwrap();
        let async_action = marker.get("_async_action").unwrap().as_map().unwrap();
        assert_eq!(async_action.get("job-1"), Some(&Value::String("pending".to_string())));

        let handle = pending.take("job-1").unwrap();
        assert_eq!(handle.wait().await.result, ActionResult::Success);
    }

    #[tokio::test]
    async fn wait_for_action_returns_the_handles_envelope() {
        let mut bus = ActionBus::new();
        bus.register("slow_compute", Arc::new(|_: Value| {
            let mut out = indexmap::IndexMap::new();
            out.insert("value".to_string(), Value::int(42));
            Envelope::success_with(out)
        }));
        let executor = executor_with(bus);
        let pending = PendingActions::new();

        let mut async_step = step("slow_compute", Value::map());
        async_step.is_async = true;
        async_step.action_id = Some("C1".to_string());
        executor.execute_step(&async_step, &Value::map(), &pending).await;

        let wait_params: Value = serde_json::from_str(r#"{"action_id": "C1"}"#).unwrap();
        let envelope = executor.execute_step(&step(WAIT_FOR_ACTION, wait_params), &Value::map(), &pending).await;

        assert_eq!(envelope.result, ActionResult::Success);
        assert_eq!(envelope.response_data.unwrap().get("value"), Some(&Value::int(42)));
    }

    #[tokio::test]
    async fn wait_for_action_without_a_pending_handle_is_not_found() {
        let executor = executor_with(ActionBus::new());
        let pending = PendingActions::new();

        let wait_params: Value = serde_json::from_str(r#"{"action_id": "missing"}"#).unwrap();
        let envelope = executor.execute_step(&step(WAIT_FOR_ACTION, wait_params), &Value::map(), &pending).await;

        assert_eq!(envelope.error.unwrap().code, ErrorCode::NotFound);
    }

    struct SlowAction;

    #[async_trait::async_trait]
    impl crate::action::Action for SlowAction {
        async fn call(&self, _data: Value) -> Envelope {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Envelope::success()
        }
    }

    #[tokio::test]
    async fn wait_for_action_times_out_without_cancelling_the_action() {
        let mut bus = ActionBus::new();
        bus.register("slow_compute", Arc::new(SlowAction));
        let executor = executor_with(bus);
        let pending = PendingActions::new();

        let mut async_step = step("slow_compute", Value::map());
        async_step.is_async = true;
        async_step.action_id = Some("C2".to_string());
        executor.execute_step(&async_step, &Value::map(), &pending).await;

        let wait_params: Value = serde_json::from_str(r#"{"action_id": "C2", "timeout_ms": 1}"#).unwrap();
        let envelope = executor.execute_step(&step(WAIT_FOR_ACTION, wait_params), &Value::map(), &pending).await;

        assert_eq!(envelope.result, ActionResult::Timeout);
    }
}
