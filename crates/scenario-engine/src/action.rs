// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action dispatch (§4 EXPANSION, §6): the seam between a step's
//! `action_name` and whatever actually performs it (sending a message,
//! calling an API, ...). Grounded in the host's action-hub pattern: actions
//! register under a name and the engine calls through a registry rather
//! than a hard-wired match statement.

use async_trait::async_trait;
use indexmap::IndexMap;
use scenario_core::{ActionError, Envelope, ErrorCode, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

#[async_trait]
pub trait Action: Send + Sync {
    async fn call(&self, data: Value) -> Envelope;
}

#[async_trait]
impl<F> Action for F
where
    F: Fn(Value) -> Envelope + Send + Sync,
{
    async fn call(&self, data: Value) -> Envelope {
        self(data)
    }
}

/// A pending fire-and-forget action's eventual result, keyed by the step's
/// `action_id` (§4.H). The engine stores the receiver half under
/// `data._async_action[action_id]` until something awaits it.
pub struct ActionHandle {
    receiver: oneshot::Receiver<Envelope>,
}

impl ActionHandle {
    pub async fn wait(self) -> Envelope {
        self.receiver.await.unwrap_or_else(|_| {
            Envelope::error(ActionError::new(
                ErrorCode::InternalError,
                "async action handle dropped before completion",
            ))
        })
    }
}

/// Registry of named actions a step's `action_name` dispatches through.
#[derive(Default)]
pub struct ActionBus {
    actions: HashMap<String, Arc<dyn Action>>,
    replaceable_fields: HashMap<String, String>,
}

impl ActionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, action: Arc<dyn Action>) {
        self.actions.insert(name.into(), action);
    }

    /// Records the one response field an action's output schema marks
    /// `replaceable: true` (§4.J's `_response_key` substitution target).
    pub fn set_replaceable_field(&mut self, action_name: impl Into<String>, field: impl Into<String>) {
        self.replaceable_fields.insert(action_name.into(), field.into());
    }

    pub fn replaceable_field(&self, action_name: &str) -> Option<&str> {
        self.replaceable_fields.get(action_name).map(String::as_str)
    }

    pub async fn execute(&self, action_name: &str, data: Value) -> Envelope {
        match self.actions.get(action_name) {
            Some(action) => action.call(data).await,
            None => Envelope::error(ActionError::new(
                ErrorCode::NotFound,
                format!("no action registered under '{action_name}'"),
            )),
        }
    }

    /// Fire-and-forget dispatch: spawns the action and returns immediately
    /// with a handle the caller can await later (§4.H's async step path).
    pub fn execute_fire_and_forget(&self, action_name: &str, data: Value) -> Option<ActionHandle> {
        let action = self.actions.get(action_name)?.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let envelope = action.call(data).await;
            let _ = tx.send(envelope);
        });
        Some(ActionHandle { receiver: rx })
    }
}

/// `{"_async_action": {action_id: {"status": ..., ...}}}` response_data
/// convenience used by [`crate::step_executor`] when registering a handle.
pub fn async_action_marker(action_id: &str) -> IndexMap<String, Value> {
    let mut inner = IndexMap::new();
    inner.insert(action_id.to_string(), Value::String("pending".to_string()));
    let mut outer = IndexMap::new();
    outer.insert("_async_action".to_string(), Value::Map(inner));
    outer
}
