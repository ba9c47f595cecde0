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
use ringkv_core::ClusterConfig;
use ringkv_core::LogicalTime;
use ringkv_core::Logger;
use ringkv_core::Network;
use ringkv_membership::Ring;
use ringkv_proto::Message;
use ringkv_proto::ReplicaRole;

use crate::store::LocalStore;
use crate::transaction::Op;
use crate::transaction::Transaction;
use crate::transaction::TransactionIdAllocator;
use crate::transaction::TransactionTable;

/// The KV coordinator and server (C5): client-side quorum transactions,
/// server-side CRUD execution, and the stabilization protocol.
///
/// Grounded on `MP2Node.cpp`'s `client*`/`checkMessages`/
/// `checkTransactionMap`/`stabilizationProtocol`. The `updateKeyValue`
/// STABLE-logging inconsistency flagged in `spec.md` §9 is corrected
/// here: CREATE/UPDATE/DELETE all skip logging and replying when
/// `trans_id == STABLE`.
pub struct KvEngine {
    self_addr: Address,
    config: ClusterConfig,
    store: LocalStore,
    transactions: TransactionTable,
    allocator: TransactionIdAllocator,
}

impl KvEngine {
    pub fn new(self_addr: Address, config: ClusterConfig, allocator: TransactionIdAllocator) -> Self {
        Self {
            self_addr,
            config,
            store: LocalStore::new(),
            transactions: TransactionTable::new(),
            allocator,
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn owned_keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys()
    }

    /// Test-only fixture hook: inserts directly into the local store,
    /// bypassing the client/server protocol entirely. Used by
    /// integration tests to construct states where a replica already
    /// holds a key before a coordinator issues a conflicting `CREATE`.
    #[cfg(feature = "test-util")]
    pub fn seed_store(&mut self, key: &str, value: &str) {
        self.store.create(key, value);
    }

    /// The predecessors on the ring whose keys this node should expect
    /// to hold as a replica, for diagnostics only; stabilization itself
    /// is push-based and does not consult this.
    pub fn replicated_from(&self, ring: &Ring) -> Vec<Address> {
        let nodes = ring.nodes();
        let Some(self_index) = nodes.iter().position(|n| n.address == self.self_addr) else {
            return Vec::new();
        };
        let count = self.config.replication_factor.saturating_sub(1).min(nodes.len().saturating_sub(1));
        (1..=count)
            .map(|i| nodes[(self_index + nodes.len() - i) % nodes.len()].address)
            .collect()
    }

    fn open_transaction(&mut self, op: Op, key: &str, value: &str, now: LogicalTime) -> i64 {
        let trans_id = self.allocator.next_id();
        self.transactions
            .insert(Transaction::new(trans_id, op, key.to_string(), value.to_string(), now));
        trans_id
    }

    pub fn client_create(
        &mut self,
        key: &str,
        value: &str,
        ring: &Ring,
        now: LogicalTime,
        network: &mut dyn Network,
    ) -> i64 {
        let trans_id = self.open_transaction(Op::Create, key, value, now);
        let replicas = ring.find_replicas(key, self.config.ring_size, self.config.replication_factor);
        for (i, addr) in replicas.into_iter().enumerate() {
            let message = Message::Create {
                trans_id,
                from: self.self_addr,
                key: key.to_string(),
                value: value.to_string(),
                role: ReplicaRole::for_index(i),
            };
            network.send(self.self_addr, addr, message.encode().into_bytes());
        }
        trans_id
    }

    pub fn client_read(&mut self, key: &str, ring: &Ring, now: LogicalTime, network: &mut dyn Network) -> i64 {
        let trans_id = self.open_transaction(Op::Read, key, "", now);
        let replicas = ring.find_replicas(key, self.config.ring_size, self.config.replication_factor);
        for (i, addr) in replicas.into_iter().enumerate() {
            let message = Message::Read {
                trans_id,
                from: self.self_addr,
                key: key.to_string(),
                role: ReplicaRole::for_index(i),
            };
            network.send(self.self_addr, addr, message.encode().into_bytes());
        }
        trans_id
    }

    pub fn client_update(
        &mut self,
        key: &str,
        value: &str,
        ring: &Ring,
        now: LogicalTime,
        network: &mut dyn Network,
    ) -> i64 {
        let trans_id = self.open_transaction(Op::Update, key, value, now);
        let replicas = ring.find_replicas(key, self.config.ring_size, self.config.replication_factor);
        for (i, addr) in replicas.into_iter().enumerate() {
            let message = Message::Update {
                trans_id,
                from: self.self_addr,
                key: key.to_string(),
                value: value.to_string(),
                role: ReplicaRole::for_index(i),
            };
            network.send(self.self_addr, addr, message.encode().into_bytes());
        }
        trans_id
    }

    pub fn client_delete(&mut self, key: &str, ring: &Ring, now: LogicalTime, network: &mut dyn Network) -> i64 {
        let trans_id = self.open_transaction(Op::Delete, key, "", now);
        let replicas = ring.find_replicas(key, self.config.ring_size, self.config.replication_factor);
        for (i, addr) in replicas.into_iter().enumerate() {
            let message = Message::Delete {
                trans_id,
                from: self.self_addr,
                key: key.to_string(),
                role: ReplicaRole::for_index(i),
            };
            network.send(self.self_addr, addr, message.encode().into_bytes());
        }
        trans_id
    }

    /// Server-side handling of an inbound CRUD request. `trans_id ==
    /// STABLE` is the stabilization path: perform the operation
    /// silently, no reply, no logging.
    pub fn handle_request(&mut self, message: Message, now: LogicalTime, network: &mut dyn Network, logger: &mut dyn Logger) {
        let stable = ClusterConfig::STABLE;
        match message {
            Message::Create { trans_id, from, key, value, .. } => {
                let success = self.store.create(&key, &value);
                if trans_id != stable {
                    if success {
                        logger.log_create_success(self.self_addr, false, trans_id, &key, &value);
                    } else {
                        logger.log_create_fail(self.self_addr, false, trans_id, &key);
                    }
                    let reply = Message::Reply {
                        trans_id,
                        from: self.self_addr,
                        success,
                    };
                    network.send(self.self_addr, from, reply.encode().into_bytes());
                }
            }
            Message::Read { trans_id, from, key, .. } => {
                let value = self.store.read(&key);
                if trans_id != stable {
                    if value.is_empty() {
                        logger.log_read_fail(self.self_addr, false, trans_id, &key);
                    } else {
                        logger.log_read_success(self.self_addr, false, trans_id, &key, &value);
                    }
                    let reply = Message::ReadReply {
                        trans_id,
                        from: self.self_addr,
                        value,
                    };
                    network.send(self.self_addr, from, reply.encode().into_bytes());
                }
            }
            Message::Update { trans_id, from, key, value, .. } => {
                let success = self.store.update(&key, &value);
                if trans_id != stable {
                    if success {
                        logger.log_update_success(self.self_addr, false, trans_id, &key, &value);
                    } else {
                        logger.log_update_fail(self.self_addr, false, trans_id, &key);
                    }
                    let reply = Message::Reply {
                        trans_id,
                        from: self.self_addr,
                        success,
                    };
                    network.send(self.self_addr, from, reply.encode().into_bytes());
                }
            }
            Message::Delete { trans_id, from, key, .. } => {
                let success = self.store.delete(&key);
                if trans_id != stable {
                    if success {
                        logger.log_delete_success(self.self_addr, false, trans_id, &key);
                    } else {
                        logger.log_delete_fail(self.self_addr, false, trans_id, &key);
                    }
                    let reply = Message::Reply {
                        trans_id,
                        from: self.self_addr,
                        success,
                    };
                    network.send(self.self_addr, from, reply.encode().into_bytes());
                }
            }
            _ => {}
        }
    }

    /// Coordinator-side handling of an inbound `REPLY`/`READREPLY`.
    pub fn handle_reply(&mut self, message: &Message) {
        match message {
            Message::Reply { trans_id, success, .. } => {
                if let Some(t) = self.transactions.get_mut(*trans_id) {
                    t.reply_count += 1;
                    if *success {
                        t.success_count += 1;
                    }
                }
            }
            Message::ReadReply { trans_id, value, .. } => {
                if let Some(t) = self.transactions.get_mut(*trans_id) {
                    t.reply_count += 1;
                    if !value.is_empty() {
                        t.success_count += 1;
                        t.read_value = value.clone();
                    }
                }
            }
            _ => {}
        }
    }

    /// The transaction decision procedure, per `spec.md` §4.5's table.
    /// Runs once per dispatch and again during `tick`'s expiry step so
    /// a transaction with no further replies still times out (I6).
    pub fn check_transaction_map(&mut self, now: LogicalTime, logger: &mut dyn Logger) {
        for id in self.transactions.ids() {
            let decision = {
                let Some(t) = self.transactions.get_mut(id) else { continue };
                decide(t, now, self.config.t_tx, self.config.replication_factor)
            };
            if let Some(success) = decision {
                let t = self.transactions.remove(id).expect("id just looked up above");
                log::debug!(
                    "{} decided transaction {} ({:?} {:?}) success={success}",
                    self.self_addr,
                    t.id,
                    t.op,
                    t.key
                );
                log_decision(self.self_addr, &t, success, logger);
            }
        }
    }

    /// Re-pushes every locally stored key to its current replica set.
    /// Receivers' idempotent stabilization-create avoids clobbering
    /// newer values; orphaned copies on nodes no longer in a key's
    /// replica set are intentionally left in place (§9).
    pub fn stabilize(&self, ring: &Ring, network: &mut dyn Network) {
        log::info!("{} stabilizing {} local keys against the current ring", self.self_addr, self.store.keys().count());
        for (key, value) in self.store.iter().map(|(k, v)| (k.to_string(), v.to_string())) {
            let replicas = ring.find_replicas(&key, self.config.ring_size, self.config.replication_factor);
            for addr in replicas {
                let message = Message::Create {
                    trans_id: ClusterConfig::STABLE,
                    from: self.self_addr,
                    key: key.clone(),
                    value: value.clone(),
                    role: ReplicaRole::Primary,
                };
                network.send(self.self_addr, addr, message.encode().into_bytes());
            }
        }
    }
}

/// Evaluates one transaction against the decision table. `replyCount ==
/// replication_factor` is checked after the two quorum short-circuits,
/// matching the redundant clause noted in `spec.md` §9 — it is
/// unreachable once a 2-of-3 majority is already in, but kept for
/// parity with the source's decision order.
fn decide(t: &Transaction, now: LogicalTime, t_tx: i64, replication_factor: usize) -> Option<bool> {
    const QUORUM: u32 = 2;
    if t.success_count >= QUORUM {
        return Some(true);
    }
    if t.reply_count - t.success_count >= QUORUM {
        return Some(false);
    }
    if t.reply_count as usize == replication_factor {
        return Some(t.success_count >= QUORUM);
    }
    if now - t.created_at > t_tx {
        return Some(false);
    }
    None
}

fn log_decision(at: Address, t: &Transaction, success: bool, logger: &mut dyn Logger) {
    match (t.op, success) {
        (Op::Create, true) => logger.log_create_success(at, true, t.id, &t.key, &t.value),
        (Op::Create, false) => logger.log_create_fail(at, true, t.id, &t.key),
        (Op::Read, true) => logger.log_read_success(at, true, t.id, &t.key, &t.read_value),
        (Op::Read, false) => logger.log_read_fail(at, true, t.id, &t.key),
        (Op::Update, true) => logger.log_update_success(at, true, t.id, &t.key, &t.value),
        (Op::Update, false) => logger.log_update_fail(at, true, t.id, &t.key),
        (Op::Delete, true) => logger.log_delete_success(at, true, t.id, &t.key),
        (Op::Delete, false) => logger.log_delete_fail(at, true, t.id, &t.key),
    }
}
