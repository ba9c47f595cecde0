// Copyright 2025 ScopeDB <contact@scopedb.io>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

/// Cluster-wide tunables. Defaults reproduce `spec.md` §6's fixed
/// constants exactly; tests shrink the timers to make fault scenarios
/// converge in a handful of ticks instead of twenty.
///
/// Mirrors `percas-core::config::Config`'s layered-struct-with-defaults
/// style, scaled down to this system's actual tunables: there is no
/// storage or telemetry section here because there is no disk layer and
/// no OTel export in a tick-driven simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ClusterConfig {
    /// Size of the consistent-hash ring's hash space.
    pub ring_size: u32,
    /// Ticks of silence after which a peer is marked suspect.
    pub t_fail: i64,
    /// Ticks of silence after which a peer is removed from the view.
    pub t_remove: i64,
    /// Ticks after which a pending transaction is reaped as a timeout.
    pub t_tx: i64,
    /// Fixed replication factor; write and read quorum are both 2 of 3.
    pub replication_factor: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            ring_size: 512,
            t_fail: 5,
            t_remove: 20,
            t_tx: 10,
            replication_factor: 3,
        }
    }
}

impl ClusterConfig {
    /// Write/read quorum size; fixed at `replication_factor - 1` (2 of 3).
    pub fn quorum(&self) -> usize {
        self.replication_factor - 1
    }

    /// Sentinel transaction id for stabilization pushes (`STABLE = -1`).
    pub const STABLE: i64 = -1;
}
