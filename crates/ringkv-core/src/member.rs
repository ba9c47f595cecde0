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

use crate::address::Address;
use crate::time::LogicalTime;

/// A peer's latest advertised liveness state, as carried on gossip frames
/// and stored in the membership view.
///
/// `timestamp` is the local logical time at which `heartbeat` was last
/// refreshed; callers must uphold `timestamp <= now` at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberEntry {
    pub address: Address,
    pub heartbeat: i64,
    pub timestamp: LogicalTime,
}

impl MemberEntry {
    pub fn new(address: Address, heartbeat: i64, timestamp: LogicalTime) -> Self {
        Self {
            address,
            heartbeat,
            timestamp,
        }
    }

    pub fn age(&self, now: LogicalTime) -> i64 {
        now - self.timestamp
    }

    /// Refresh this entry in place if `other` carries a strictly higher
    /// heartbeat; heartbeats only ever move forward (I5).
    pub fn merge(&mut self, heartbeat: i64, timestamp: LogicalTime) -> bool {
        if heartbeat > self.heartbeat {
            self.heartbeat = heartbeat;
            self.timestamp = timestamp;
            true
        } else {
            false
        }
    }

    pub fn status(&self, now: LogicalTime, t_fail: i64, t_remove: i64) -> MemberStatus {
        let age = self.age(now);
        if age >= t_remove {
            MemberStatus::Removed
        } else if age >= t_fail {
            MemberStatus::Suspect
        } else {
            MemberStatus::Live
        }
    }
}

/// The derived liveness state for a peer, per `spec.md` §4.3's per-peer
/// state machine: `Live -> Suspect -> Removed`, reset to `Live` by any
/// higher-heartbeat update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MemberStatus {
    Live,
    Suspect,
    Removed,
}

/// A `MemberEntry` paired with its derived status, as returned by
/// `MembershipService::snapshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberView {
    pub entry: MemberEntry,
    pub status: MemberStatus,
}
