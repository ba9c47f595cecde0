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

//! Black-box harness for driving several `ringkv` nodes over a
//! simulated network, the way `tests/behavior` drives a real cluster
//! against the teacher's client API. Every node here is in-process;
//! `Cluster::tick` plays the role the teacher's test server plays for a
//! single external driver step, advancing every node by exactly one
//! logical time unit per call.

use ringkv_core::Address;
use ringkv_core::ClusterConfig;
use ringkv_core::LogicalTime;
use ringkv_kv::TransactionIdAllocator;
use ringkv_node::Node;
use ringkv_sim_toolkit::RecordingLogger;
use ringkv_sim_toolkit::SimClock;
use ringkv_sim_toolkit::SimNetwork;

/// A small in-process cluster: `count` nodes at addresses
/// `(1,0)..(count,0)`, a shared simulated network, a shared logical
/// clock, and a recording logger every node's events are appended to.
pub struct Cluster {
    pub nodes: Vec<Node>,
    pub network: SimNetwork,
    pub clock: SimClock,
    pub logger: RecordingLogger,
    config: ClusterConfig,
}

impl Cluster {
    pub fn new(count: u32, config: ClusterConfig) -> Self {
        let allocator = TransactionIdAllocator::new();
        let nodes = (0..count)
            .map(|i| Node::new(Address::new(i + 1, 0), config.clone(), allocator.clone()))
            .collect();
        Self {
            nodes,
            network: SimNetwork::new(),
            clock: SimClock::new(),
            logger: RecordingLogger::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn address(&self, index: usize) -> Address {
        self.nodes[index].address()
    }

    /// Starts every node against the fixed introducer, node 0.
    pub fn bootstrap_all(&mut self) {
        let introducer = self.nodes[0].address();
        for node in &mut self.nodes {
            node.start(introducer, &mut self.network);
        }
    }

    /// Starts a single node (by index) against the fixed introducer, for
    /// scenarios that bring nodes up one at a time (e.g. a late join).
    pub fn bootstrap(&mut self, index: usize) {
        let introducer = self.nodes[0].address();
        self.nodes[index].start(introducer, &mut self.network);
    }

    /// Advances the cluster by one logical tick: delivers every frame
    /// due this tick to its destination's inbox, then ticks every node.
    /// Node order is stable (ascending address) but message delivery
    /// and dispatch order is not guaranteed across runs, matching
    /// `spec.md` §5's unordered-delivery model.
    pub fn tick(&mut self) -> LogicalTime {
        let now = self.clock.advance();
        self.network.set_now(now);
        for node in &mut self.nodes {
            for frame in self.network.drain_ready(node.address(), now) {
                node.enqueue(frame);
            }
        }
        for node in &mut self.nodes {
            node.tick(now, &mut self.network, &mut self.logger);
        }
        now
    }

    pub fn tick_n(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Advances the cluster by one tick, but skips every node at an
    /// index in `excluded`: they neither receive queued frames nor
    /// advance their own heartbeat, simulating a node that has stopped
    /// ticking (scenario 2, §8) without removing it from the cluster.
    pub fn tick_excluding(&mut self, excluded: &[usize]) -> LogicalTime {
        let now = self.clock.advance();
        self.network.set_now(now);
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if excluded.contains(&i) {
                continue;
            }
            for frame in self.network.drain_ready(node.address(), now) {
                node.enqueue(frame);
            }
        }
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if excluded.contains(&i) {
                continue;
            }
            node.tick(now, &mut self.network, &mut self.logger);
        }
        now
    }

    pub fn tick_n_excluding(&mut self, n: u32, excluded: &[usize]) {
        for _ in 0..n {
            self.tick_excluding(excluded);
        }
    }

    /// Test-only fixture hook; see [`ringkv_kv::KvEngine::seed_store`].
    pub fn seed_store(&mut self, index: usize, key: &str, value: &str) {
        self.nodes[index].seed_store(key, value);
    }

    pub fn now(&self) -> LogicalTime {
        self.clock.now()
    }

    pub fn client_create(&mut self, from: usize, key: &str, value: &str) -> i64 {
        let now = self.clock.now();
        self.nodes[from].client_create(key, value, now, &mut self.network)
    }

    pub fn client_read(&mut self, from: usize, key: &str) -> i64 {
        let now = self.clock.now();
        self.nodes[from].client_read(key, now, &mut self.network)
    }

    pub fn client_update(&mut self, from: usize, key: &str, value: &str) -> i64 {
        let now = self.clock.now();
        self.nodes[from].client_update(key, value, now, &mut self.network)
    }

    pub fn client_delete(&mut self, from: usize, key: &str) -> i64 {
        let now = self.clock.now();
        self.nodes[from].client_delete(key, now, &mut self.network)
    }
}
