// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of in-flight async action handles for one scenario run (§4.H).
//! The handle itself (a one-shot receiver) can't live inside the `Value`
//! tree, so `data._async_action` only ever carries a status marker string;
//! the real [`ActionHandle`] sits here, keyed by the same `action_id`,
//! until something awaits it.

use crate::action::ActionHandle;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct PendingActions {
    handles: Mutex<HashMap<String, ActionHandle>>,
}

impl PendingActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, action_id: String, handle: ActionHandle) {
        self.handles.lock().insert(action_id, handle);
    }

    /// Removes and returns the handle for `action_id`, if one is still
    /// pending — awaiting consumes it, so a second await on the same id
    /// finds nothing.
    pub fn take(&self, action_id: &str) -> Option<ActionHandle> {
        self.handles.lock().remove(action_id)
    }
}
