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

/// The logging sink named in `spec.md` §6: one method per membership or
/// operation outcome that the spec requires to be observable. Every CRUD
/// method takes the acting node's address, whether it is acting as
/// coordinator or as a replica, the transaction id, and key/value
/// context, exactly as enumerated in §6.
pub trait Logger {
    fn log_node_add(&mut self, at: Address, added: Address, now: LogicalTime);
    fn log_node_remove(&mut self, at: Address, removed: Address, now: LogicalTime);

    fn log_create_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str);
    fn log_create_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str);

    fn log_read_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str);
    fn log_read_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str);

    fn log_update_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str, value: &str);
    fn log_update_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str);

    fn log_delete_success(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str);
    fn log_delete_fail(&mut self, at: Address, is_coordinator: bool, trans_id: i64, key: &str);
}
