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

use std::collections::BTreeMap;

use ringkv_core::Address;
use ringkv_core::LogicalTime;
use ringkv_core::MemberEntry;
use ringkv_core::MemberView;

/// Ordered set of known peers, keyed uniquely by address. The owning
/// node's own entry is never stored here (I1) — it is tracked
/// separately as the node's own heartbeat counter.
///
/// Grounded on `percas-gossip::member::Membership`'s `BTreeMap`-keyed
/// store and heartbeat-merge-on-update logic, adapted from the
/// teacher's UUID keys to `Address` keys and from wall-clock
/// `jiff::Timestamp` to logical ticks.
#[derive(Debug, Clone, Default)]
pub struct MembershipView {
    entries: BTreeMap<Address, MemberEntry>,
}

/// The effect a merge had on the view, used by callers that need to log
/// joins distinctly from refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Added,
    Updated,
    Unchanged,
}

impl MembershipView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.entries.contains_key(&address)
    }

    pub fn get(&self, address: Address) -> Option<&MemberEntry> {
        self.entries.get(&address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MemberEntry> {
        self.entries.values()
    }

    /// Adds `address` with a fresh entry if absent, otherwise refreshes
    /// it only if `heartbeat` strictly exceeds the stored value (I5).
    /// Self must never be inserted; callers are responsible for
    /// excluding their own address before calling this.
    pub fn merge(&mut self, address: Address, heartbeat: i64, timestamp: LogicalTime) -> MergeOutcome {
        match self.entries.get_mut(&address) {
            Some(existing) => {
                if existing.merge(heartbeat, timestamp) {
                    MergeOutcome::Updated
                } else {
                    MergeOutcome::Unchanged
                }
            }
            None => {
                self.entries.insert(address, MemberEntry::new(address, heartbeat, timestamp));
                MergeOutcome::Added
            }
        }
    }

    /// Removes every entry whose age has reached `t_remove`, returning
    /// the removed addresses for the caller to log. The original
    /// C++ scans the member list in reverse so index-based removal
    /// stays valid as entries are swap-removed; a `BTreeMap` has no
    /// such hazard, so this simply retains the fresh entries.
    pub fn remove_stale(&mut self, now: LogicalTime, t_remove: i64) -> Vec<Address> {
        let stale: Vec<Address> = self
            .entries
            .values()
            .filter(|e| e.age(now) >= t_remove)
            .map(|e| e.address)
            .collect();
        for addr in &stale {
            self.entries.remove(addr);
        }
        stale
    }

    /// The public, status-annotated view of the cluster (§9 Open
    /// Question: promote suspicion state to the snapshot rather than
    /// leaving `TFAIL` unobservable).
    pub fn snapshot(&self, now: LogicalTime, t_fail: i64, t_remove: i64) -> Vec<MemberView> {
        self.entries
            .values()
            .map(|entry| MemberView {
                entry: *entry,
                status: entry.status(now, t_fail, t_remove),
            })
            .collect()
    }
}
