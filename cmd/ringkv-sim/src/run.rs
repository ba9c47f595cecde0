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

use std::path::PathBuf;

use clap::ValueHint;
use exn::Result;
use ringkv_core::Address;
use ringkv_kv::TransactionIdAllocator;
use ringkv_node::Node;
use ringkv_sim_toolkit::SimClock;
use ringkv_sim_toolkit::SimNetwork;
use ringkv_sim_toolkit::StdLogger;

use crate::Error;
use crate::config::load_config;

#[derive(Debug, clap::Parser)]
pub struct CommandRun {
    /// Path to a TOML file overriding the default cluster tunables.
    #[clap(short, long, help = "Path to config file", value_hint = ValueHint::FilePath)]
    config_file: Option<PathBuf>,

    /// Number of nodes to bring up, including the introducer.
    #[clap(short, long, default_value_t = 5)]
    nodes: u32,

    /// Number of logical ticks to run the simulation for.
    #[clap(short, long, default_value_t = 60)]
    ticks: i64,

    /// Fraction of frames dropped in transit, in [0.0, 1.0].
    #[clap(long, default_value_t = 0.0)]
    loss_rate: f64,

    /// Extra ticks each frame waits before becoming deliverable.
    #[clap(long, default_value_t = 0)]
    delay: i64,
}

impl CommandRun {
    pub fn run(self) -> Result<(), Error> {
        let config = load_config(self.config_file.as_deref())?;
        log::info!("ringkv-sim starting {} nodes for {} ticks", self.nodes, self.ticks);

        let introducer = Address::INTRODUCER;
        let allocator = TransactionIdAllocator::new();
        let mut nodes: Vec<Node> = (0..self.nodes)
            .map(|i| Node::new(Address::new(i + 1, 0), config.clone(), allocator.clone()))
            .collect();

        let mut network = SimNetwork::new().with_loss_rate(self.loss_rate).with_delay(self.delay);
        let mut clock = SimClock::new();
        let mut logger = StdLogger;

        for node in &mut nodes {
            node.start(introducer, &mut network);
        }

        for tick in 1..=self.ticks {
            let now = clock.advance();
            network.set_now(now);

            if tick == 5 {
                log::info!("issuing a demo CREATE(\"hello\", \"world\") from node 1");
                nodes[0].client_create("hello", "world", now, &mut network);
            }
            if tick == 30 {
                log::info!("issuing a demo READ(\"hello\") from node 1");
                nodes[0].client_read("hello", now, &mut network);
            }

            for node in &mut nodes {
                for frame in network.drain_ready(node.address(), now) {
                    node.enqueue(frame);
                }
            }
            for node in &mut nodes {
                node.tick(now, &mut network, &mut logger);
            }
        }

        for node in &nodes {
            log::info!(
                "node {} sees {} live members, ring length {}, {} local keys",
                node.address(),
                node.membership().view().len(),
                node.ring().len(),
                node.kv().owned_keys().count(),
            );
        }

        Ok(())
    }
}
