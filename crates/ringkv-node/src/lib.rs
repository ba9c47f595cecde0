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

//! Per-tick orchestration (`Node`) wiring the membership service, the
//! consistent-hash ring and the KV engine into the four-step control
//! flow `spec.md` §2 describes. Not a numbered component of its own —
//! every node in the simulated cluster is one `Node` value, driven once
//! per logical time unit by an external harness.

use std::collections::VecDeque;

use ringkv_core::Address;
use ringkv_core::ClusterConfig;
use ringkv_core::Logger;
use ringkv_core::Network;
use ringkv_kv::KvEngine;
use ringkv_kv::TransactionIdAllocator;
use ringkv_membership::MembershipService;
use ringkv_membership::Ring;
use ringkv_proto::Message;

/// One peer in the simulated cluster. Owns its inbound queue of raw
/// wire frames (undecoded until dispatch, per `spec.md` §9's ownership
/// note), its membership view, its KV engine, and the ring derived from
/// both.
pub struct Node {
    self_addr: Address,
    config: ClusterConfig,
    inbox: VecDeque<Vec<u8>>,
    membership: MembershipService,
    kv: KvEngine,
    ring: Ring,
}

impl Node {
    pub fn new(self_addr: Address, config: ClusterConfig, allocator: TransactionIdAllocator) -> Self {
        let membership = MembershipService::new(self_addr, config.t_fail, config.t_remove);
        let kv = KvEngine::new(self_addr, config.clone(), allocator);
        let ring = Ring::recompute([self_addr], config.ring_size);
        Self {
            self_addr,
            config,
            inbox: VecDeque::new(),
            membership,
            kv,
            ring,
        }
    }

    pub fn address(&self) -> Address {
        self.self_addr
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }

    pub fn kv(&self) -> &KvEngine {
        &self.kv
    }

    /// Bootstraps membership against `introducer`: immediate self-join
    /// if this node *is* the introducer, otherwise a `JOINREQ`.
    pub fn start(&mut self, introducer: Address, network: &mut dyn Network) {
        self.membership.start(introducer, network);
        self.recompute_ring();
    }

    /// Called by the network shim to deliver one undecoded wire frame.
    pub fn enqueue(&mut self, frame: Vec<u8>) {
        self.inbox.push_back(frame);
    }

    /// Executes the four steps of `spec.md` §2's per-tick control flow.
    pub fn tick(&mut self, now: i64, network: &mut dyn Network, logger: &mut dyn Logger) {
        self.dispatch_inbox(now, network, logger);
        self.membership.tick(now, network, logger);
        if self.recompute_ring() {
            self.kv.stabilize(&self.ring, network);
        }
        self.kv.check_transaction_map(now, logger);
    }

    fn dispatch_inbox(&mut self, now: i64, network: &mut dyn Network, logger: &mut dyn Logger) {
        while let Some(frame) = self.inbox.pop_front() {
            let frame = match String::from_utf8(frame) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("{} dropping non-utf8 frame: {e}", self.self_addr);
                    continue;
                }
            };
            let message = match Message::decode(&frame) {
                Ok(message) => message,
                Err(e) => {
                    log::warn!("{} dropping malformed frame: {e}", self.self_addr);
                    continue;
                }
            };
            match message {
                Message::JoinReq { .. } | Message::JoinRep { .. } | Message::Ping { .. } => {
                    self.membership.on_message(message, now, network, logger);
                }
                Message::Create { .. } | Message::Read { .. } | Message::Update { .. } | Message::Delete { .. } => {
                    self.kv.handle_request(message, now, network, logger);
                }
                Message::Reply { .. } | Message::ReadReply { .. } => {
                    self.kv.handle_reply(&message);
                }
            }
        }
    }

    /// Recomputes the ring from `membership.view() ∪ {self}`; returns
    /// whether the topology changed from the previously cached ring.
    fn recompute_ring(&mut self) -> bool {
        let addresses = self.membership.view().addresses().chain(std::iter::once(self.self_addr));
        let new_ring = Ring::recompute(addresses, self.config.ring_size);
        let changed = new_ring.changed_from(&self.ring);
        self.ring = new_ring;
        changed
    }

    pub fn client_create(&mut self, key: &str, value: &str, now: i64, network: &mut dyn Network) -> i64 {
        self.kv.client_create(key, value, &self.ring, now, network)
    }

    pub fn client_read(&mut self, key: &str, now: i64, network: &mut dyn Network) -> i64 {
        self.kv.client_read(key, &self.ring, now, network)
    }

    pub fn client_update(&mut self, key: &str, value: &str, now: i64, network: &mut dyn Network) -> i64 {
        self.kv.client_update(key, value, &self.ring, now, network)
    }

    pub fn client_delete(&mut self, key: &str, now: i64, network: &mut dyn Network) -> i64 {
        self.kv.client_delete(key, &self.ring, now, network)
    }

    /// Test-only fixture hook; see [`ringkv_kv::KvEngine::seed_store`].
    #[cfg(feature = "test-util")]
    pub fn seed_store(&mut self, key: &str, value: &str) {
        self.kv.seed_store(key, value);
    }
}
