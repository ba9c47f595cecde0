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

use ringkv_core::Address;
use ringkv_core::LogicalTime;
use ringkv_core::Logger;

/// Forwards every logging operation to the `log` facade with structured
/// kv fields, the way `percas-gossip` logs membership events. Used by
/// `cmd/ringkv-sim`; tests generally prefer [`RecordingLogger`] so
/// assertions don't have to scrape log output.
#[derive(Debug, Default)]
pub struct StdLogger;

impl Logger for StdLogger {
    fn log_node_add(&mut self, at: Address, added: Address, now: LogicalTime) {
        log::info!(at:% = at, added:% = added, now = now; "member joined");
    }

    fn log_node_remove(&mut self, at: Address, removed: Address, now: LogicalTime) {
        log::info!(at:% = at, removed:% = removed, now = now; "member removed");
    }

    fn log_create_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str) {
        log::info!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key, value = value; "create succeeded");
    }

    fn log_create_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        log::warn!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key; "create failed");
    }

    fn log_read_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str) {
        log::info!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key, value = value; "read succeeded");
    }

    fn log_read_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        log::warn!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key; "read failed");
    }

    fn log_update_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str) {
        log::info!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key, value = value; "update succeeded");
    }

    fn log_update_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        log::warn!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key; "update failed");
    }

    fn log_delete_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        log::info!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key; "delete succeeded");
    }

    fn log_delete_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        log::warn!(at:% = at, coordinator = is_coordinator, trans_id = trans_id, key = key; "delete failed");
    }
}

/// One recorded logging call, as accumulated by [`RecordingLogger`] for
/// test assertions over invariants I6/I7 and laws L1-L3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    NodeAdd { at: Address, added: Address },
    NodeRemove { at: Address, removed: Address },
    CreateSuccess { at: Address, is_coordinator: bool, trans_id: i64, key: String, value: String },
    CreateFail { at: Address, is_coordinator: bool, trans_id: i64, key: String },
    ReadSuccess { at: Address, is_coordinator: bool, trans_id: i64, key: String, value: String },
    ReadFail { at: Address, is_coordinator: bool, trans_id: i64, key: String },
    UpdateSuccess { at: Address, is_coordinator: bool, trans_id: i64, key: String, value: String },
    UpdateFail { at: Address, is_coordinator: bool, trans_id: i64, key: String },
    DeleteSuccess { at: Address, is_coordinator: bool, trans_id: i64, key: String },
    DeleteFail { at: Address, is_coordinator: bool, trans_id: i64, key: String },
}

/// Accumulates every logging call into a plain `Vec` so integration
/// tests can assert on it directly instead of scraping `log` output —
/// the reusable counterpart to the one-off recorder locals the teacher
/// writes inline in its own behavior tests.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    pub events: Vec<LogEvent>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinator-side decision events for `trans_id`, in the order
    /// they were logged — used to check I7 (at most one per id).
    pub fn coordinator_decisions_for(&self, trans_id: i64) -> Vec<&LogEvent> {
        self.events
            .iter()
            .filter(|e| {
                matches!(e,
                    LogEvent::CreateSuccess { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::CreateFail { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::ReadSuccess { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::ReadFail { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::UpdateSuccess { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::UpdateFail { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::DeleteSuccess { is_coordinator: true, trans_id: id, .. }
                    | LogEvent::DeleteFail { is_coordinator: true, trans_id: id, .. }
                    if *id == trans_id)
            })
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log_node_add(&mut self, at: Address, added: Address, _now: LogicalTime) {
        self.events.push(LogEvent::NodeAdd { at, added });
    }

    fn log_node_remove(&mut self, at: Address, removed: Address, _now: LogicalTime) {
        self.events.push(LogEvent::NodeRemove { at, removed });
    }

    fn log_create_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str) {
        self.events.push(LogEvent::CreateSuccess {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn log_create_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        self.events.push(LogEvent::CreateFail {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
        });
    }

    fn log_read_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str) {
        self.events.push(LogEvent::ReadSuccess {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn log_read_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        self.events.push(LogEvent::ReadFail {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
        });
    }

    fn log_update_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str) {
        self.events.push(LogEvent::UpdateSuccess {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn log_update_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        self.events.push(LogEvent::UpdateFail {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
        });
    }

    fn log_delete_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        self.events.push(LogEvent::DeleteSuccess {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
        });
    }

    fn log_delete_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str) {
        self.events.push(LogEvent::DeleteFail {
            at,
            is_coordinator,
            trans_id,
            key: key.to_string(),
        });
    }
}
