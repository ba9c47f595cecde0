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

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use ringkv_core::LogicalTime;

/// The client operation a `Transaction` was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Read,
    Update,
    Delete,
}

/// Coordinator-side bookkeeping for one in-flight client call. Created
/// on every `client*` call and removed on quorum decision or timeout.
/// Grounded on `MP2Node.h`'s `Transaction` struct.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub op: Op,
    pub key: String,
    pub value: String,
    pub created_at: LogicalTime,
    pub reply_count: u32,
    pub success_count: u32,
    pub read_value: String,
}

impl Transaction {
    pub fn new(id: i64, op: Op, key: String, value: String, created_at: LogicalTime) -> Self {
        Self {
            id,
            op,
            key,
            value,
            created_at,
            reply_count: 0,
            success_count: 0,
            read_value: String::new(),
        }
    }
}

/// The live transaction table, keyed by `transID`.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    transactions: HashMap<i64, Transaction>,
}

impl TransactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, transaction: Transaction) {
        self.transactions.insert(transaction.id, transaction);
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Transaction> {
        self.transactions.get_mut(&id)
    }

    pub fn remove(&mut self, id: i64) -> Option<Transaction> {
        self.transactions.remove(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.transactions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// A process-wide monotonic counter for `transID` allocation. Modeled,
/// per `spec.md` §9's explicit guidance, as an atomic fetch-add so
/// multiple coordinators sharing a simulation run still produce
/// globally unique ids; a single-node harness can equally well clone
/// this into one `KvEngine`.
#[derive(Debug, Clone)]
pub struct TransactionIdAllocator {
    next: Arc<AtomicI64>,
}

impl TransactionIdAllocator {
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for TransactionIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
