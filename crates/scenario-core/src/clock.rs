// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable scheduler ticks (§6).
//!
//! Grounded in the reference workspace's `core::clock` module: a trait plus
//! a real and a fake implementation, generalised here to the wall-clock
//! local-time semantics the scheduler needs (`now_local`,
//! `to_iso_local_string`) instead of monotonic instants.

use chrono::{DateTime, Local, SecondsFormat};
use parking_lot::Mutex;
use std::sync::Arc;

/// Wall-clock source for the scheduled-scenario manager (§4.L, §6).
pub trait Clock: Clone + Send + Sync {
    fn now_local(&self) -> DateTime<Local>;

    fn to_iso_local_string(&self, t: DateTime<Local>) -> String {
        t.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Deterministic clock for scheduler tests: holds an explicit instant that
/// only moves when told to.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Local>>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, t: DateTime<Local>) {
        *self.current.lock() = t;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.current.lock();
        *guard += duration;
    }
}

impl Clock for FakeClock {
    fn now_local(&self) -> DateTime<Local> {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
