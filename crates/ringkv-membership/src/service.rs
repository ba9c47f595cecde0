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
use ringkv_core::MemberEntry;
use ringkv_core::MemberView;
use ringkv_core::Network;
use ringkv_proto::Message;

use crate::member::MembershipView;

/// The gossip-based membership service (C3): heartbeat propagation,
/// per-member liveness tracking, bootstrap via a fixed introducer, and
/// production of the cluster's sorted view.
///
/// Grounded on `MP1Node.cpp`'s `nodeLoopOps`/`pingHandler`/
/// `recvCallBack`/`AddToMemberList` (full-view gossip to every known
/// peer each tick, not random sampling), expressed in the teacher's
/// handler shape (`percas-gossip::gossip::GossipState::handle_message`)
/// but driven synchronously by `tick` instead of a background task.
pub struct MembershipService {
    self_addr: Address,
    self_heartbeat: i64,
    in_group: bool,
    t_fail: i64,
    t_remove: i64,
    view: MembershipView,
}

impl MembershipService {
    pub fn new(self_addr: Address, t_fail: i64, t_remove: i64) -> Self {
        Self {
            self_addr,
            self_heartbeat: 0,
            in_group: false,
            t_fail,
            t_remove,
            view: MembershipView::new(),
        }
    }

    pub fn in_group(&self) -> bool {
        self.in_group
    }

    pub fn view(&self) -> &MembershipView {
        &self.view
    }

    /// If `self_addr` equals `introducer`, the node is the group founder
    /// and is immediately `in_group`. Otherwise it sends `JOINREQ` to the
    /// introducer and stays out of the group until a `JOINREP` arrives.
    pub fn start(&mut self, introducer: Address, network: &mut dyn Network) {
        if self.self_addr == introducer {
            self.in_group = true;
            return;
        }
        let join_req = Message::JoinReq {
            from: self.self_addr,
            heartbeat: self.self_heartbeat,
            members: Vec::new(),
        };
        network.send(self.self_addr, introducer, join_req.encode().into_bytes());
    }

    pub fn on_message(
        &mut self,
        message: Message,
        now: LogicalTime,
        network: &mut dyn Network,
        logger: &mut dyn Logger,
    ) {
        match message {
            Message::JoinReq { from, heartbeat, .. } => {
                self.add_peer(from, heartbeat, now, logger);
                let join_rep = Message::JoinRep {
                    from: self.self_addr,
                    heartbeat: self.self_heartbeat,
                    members: self.view.entries().copied().collect(),
                };
                network.send(self.self_addr, from, join_rep.encode().into_bytes());
            }
            Message::JoinRep { from, heartbeat, members } => {
                self.add_peer(from, heartbeat, now, logger);
                self.merge_incoming(&members, now, logger);
                self.in_group = true;
            }
            Message::Ping { from, heartbeat, members } => {
                log::debug!("{} received ping from {from} (heartbeat={heartbeat})", self.self_addr);
                if from != self.self_addr {
                    match self.view.merge(from, heartbeat, now) {
                        crate::member::MergeOutcome::Added => logger.log_node_add(self.self_addr, from, now),
                        _ => {}
                    }
                }
                self.merge_incoming(&members, now, logger);
            }
            _ => {}
        }
    }

    /// 1. Advance the self heartbeat. 2. Evict peers silent for
    /// `t_remove` ticks. 3. Gossip the full view to every remaining
    /// peer (self is never pinged).
    pub fn tick(&mut self, now: LogicalTime, network: &mut dyn Network, logger: &mut dyn Logger) {
        self.self_heartbeat += 1;

        for removed in self.view.remove_stale(now, self.t_remove) {
            log::info!("{} removing stale member {removed} at tick {now}", self.self_addr);
            logger.log_node_remove(self.self_addr, removed, now);
        }

        let ping = Message::Ping {
            from: self.self_addr,
            heartbeat: self.self_heartbeat,
            members: self.view.entries().copied().collect(),
        };
        let frame = ping.encode().into_bytes();
        for peer in self.view.addresses().collect::<Vec<_>>() {
            network.send(self.self_addr, peer, frame.clone());
        }
    }

    pub fn snapshot(&self, now: LogicalTime) -> Vec<MemberView> {
        self.view.snapshot(now, self.t_fail, self.t_remove)
    }

    fn add_peer(&mut self, address: Address, heartbeat: i64, now: LogicalTime, logger: &mut dyn Logger) -> bool {
        if address == self.self_addr {
            return false;
        }
        match self.view.merge(address, heartbeat, now) {
            crate::member::MergeOutcome::Added => {
                log::info!("{} adding member {address}", self.self_addr);
                logger.log_node_add(self.self_addr, address, now);
                true
            }
            _ => false,
        }
    }

    /// Merges a peer's carried membership list into our own, per
    /// `spec.md` §4.3: refresh known entries on a higher heartbeat,
    /// adopt unknown entries transitively if they are not already
    /// stale (`now - e.timestamp < t_remove`).
    fn merge_incoming(&mut self, members: &[MemberEntry], now: LogicalTime, logger: &mut dyn Logger) {
        for member in members {
            if member.address == self.self_addr {
                continue;
            }
            if self.view.contains(member.address) {
                self.view.merge(member.address, member.heartbeat, now);
            } else if now - member.timestamp < self.t_remove {
                self.view.merge(member.address, member.heartbeat, now);
                logger.log_node_add(self.self_addr, member.address, now);
            }
        }
    }
}
