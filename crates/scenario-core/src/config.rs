// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration-derived invariants declared at process start (§6).
//!
//! Mirrors the reference workspace's plain-struct-plus-`Default`
//! configuration pattern (e.g. `JobConfig`), loadable from TOML.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioEngineConfig {
    /// Tenant ids at or below this are system tenants (local-only).
    pub max_system_tenant_id: i64,
    /// Snapshot cache TTL in seconds. The original treats ~10 years as
    /// "effectively eternal"; we keep that convention rather than using a
    /// literal unbounded value, since call sites still thread a TTL through.
    pub cache_ttl_seconds: i64,
    /// Bound on recursive placeholder resolution (§4.D).
    pub max_nesting_depth: u32,
}

impl Default for ScenarioEngineConfig {
    fn default() -> Self {
        Self {
            max_system_tenant_id: 100,
            cache_ttl_seconds: 315_360_000,
            max_nesting_depth: 10,
        }
    }
}

impl ScenarioEngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn is_system_tenant(&self, tenant_id: i64) -> bool {
        tenant_id <= self.max_system_tenant_id
    }
}
