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

//! Local store (C2) and KV coordinator/server (C5) for ringkv: CRUD over
//! an in-memory map, coordinator-side quorum transactions with timeouts,
//! and the stabilization protocol that re-replicates owned keys when the
//! ring changes.

mod engine;
mod store;
mod transaction;

pub use engine::KvEngine;
pub use store::LocalStore;
pub use transaction::Op;
pub use transaction::Transaction;
pub use transaction::TransactionIdAllocator;
pub use transaction::TransactionTable;
