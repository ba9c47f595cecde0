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

//! The six end-to-end scenarios enumerated in `spec.md` §8, each driven
//! against a small in-process cluster over `ringkv-sim-toolkit`'s
//! simulated network.

use behavior_tests::Cluster;
use ringkv_core::ClusterConfig;
use ringkv_sim_toolkit::LogEvent;

fn fast_config() -> ClusterConfig {
    ClusterConfig {
        t_fail: 2,
        t_remove: 6,
        t_tx: 4,
        ..ClusterConfig::default()
    }
}

/// Scenario 1: node A bootstraps alone, node B joins via JOINREQ/JOINREP,
/// and within a couple of ticks both sides see each other and have
/// logged a join.
#[test]
fn join() {
    let mut cluster = Cluster::new(2, fast_config());
    cluster.bootstrap_all();
    cluster.tick_n(2);

    let a = cluster.address(0);
    let b = cluster.address(1);
    assert!(cluster.nodes[0].membership().view().contains(b));
    assert!(cluster.nodes[1].membership().view().contains(a));
    assert!(cluster.logger.events.contains(&LogEvent::NodeAdd { at: a, added: b }));
    assert!(cluster.logger.events.contains(&LogEvent::NodeAdd { at: b, added: a }));
}

/// Scenario 2: with a converged cluster {A,B,C}, C stops ticking. Once
/// its silence exceeds `t_remove`, the surviving nodes remove it and
/// their rings shrink accordingly.
#[test]
fn failure_detection() {
    let mut cluster = Cluster::new(3, fast_config());
    cluster.bootstrap_all();
    cluster.tick_n(4); // let membership converge to a full mesh

    let c = cluster.address(2);
    assert_eq!(cluster.nodes[0].ring().len(), 3);
    assert_eq!(cluster.nodes[1].ring().len(), 3);

    // C stops ticking; A and B keep going.
    cluster.tick_n_excluding(cluster.config().t_remove as u32 + 1, &[2]);

    assert!(!cluster.nodes[0].membership().view().contains(c));
    assert!(!cluster.nodes[1].membership().view().contains(c));
    assert_eq!(cluster.nodes[0].ring().len(), 2);
    assert_eq!(cluster.nodes[1].ring().len(), 2);

    let a = cluster.address(0);
    let b = cluster.address(1);
    assert!(cluster.logger.events.contains(&LogEvent::NodeRemove { at: a, removed: c }));
    assert!(cluster.logger.events.contains(&LogEvent::NodeRemove { at: b, removed: c }));
}

/// Scenario 3: a quorum CREATE succeeds once at least two of the three
/// replicas accept the write, even though the coordinator eventually
/// hears from all three.
#[test]
fn quorum_create_succeeds_on_majority() {
    let mut cluster = Cluster::new(4, fast_config());
    cluster.bootstrap_all();
    cluster.tick_n(4);

    let trans_id = cluster.client_create(0, "k", "v");
    cluster.tick_n(3);

    let decisions = cluster.logger.coordinator_decisions_for(trans_id);
    assert_eq!(decisions.len(), 1, "exactly one coordinator decision per transaction (I7)");
    assert!(matches!(decisions[0], LogEvent::CreateSuccess { .. }));
}

/// Variant of scenario 3: a replica that already holds the key rejects
/// the CREATE, but the coordinator still logs success once the other
/// two replicas accept it (2-of-3 quorum).
#[test]
fn quorum_create_succeeds_despite_one_replica_rejecting() {
    let mut cluster = Cluster::new(4, fast_config());
    cluster.bootstrap_all();
    cluster.tick_n(4);

    let replicas = cluster.nodes[0].ring().find_replicas("k", cluster.config().ring_size, 3);
    let occupied = cluster.nodes.iter().position(|n| n.address() == replicas[0]).unwrap();
    cluster.seed_store(occupied, "k", "pre-existing");

    let trans_id = cluster.client_create(0, "k", "v");
    cluster.tick_n(3);

    let decisions = cluster.logger.coordinator_decisions_for(trans_id);
    assert_eq!(decisions.len(), 1);
    assert!(matches!(decisions[0], LogEvent::CreateSuccess { .. }));
}

/// Scenario 4: a READ succeeds with the value carried by the majority
/// of replicas even when one replica reports the key absent.
#[test]
fn quorum_read_under_one_absence() {
    let mut cluster = Cluster::new(4, fast_config());
    cluster.bootstrap_all();
    cluster.tick_n(4);

    cluster.client_create(0, "k", "v");
    cluster.tick_n(3);

    let read_id = cluster.client_read(0, "k");
    cluster.tick_n(3);

    let decisions = cluster.logger.coordinator_decisions_for(read_id);
    assert_eq!(decisions.len(), 1);
    match decisions[0] {
        LogEvent::ReadSuccess { value, .. } => assert_eq!(value, "v"),
        other => panic!("expected ReadSuccess, got {other:?}"),
    }
}

/// Scenario 5: a transaction with no quorum of replies by `t_tx` ticks
/// is reaped as a timeout and logged as a coordinator-side failure.
#[test]
fn transaction_times_out_without_quorum() {
    let mut cluster = Cluster::new(4, fast_config());
    // Do not let membership converge: with no replicas reachable, the
    // ring has fewer than 3 nodes so `find_replicas` degenerates — use
    // a converged cluster instead and drop all traffic to starve replies.
    cluster.bootstrap_all();
    cluster.tick_n(4);
    cluster.network = ringkv_sim_toolkit::SimNetwork::new().with_loss_rate(1.0);

    let trans_id = cluster.client_update(0, "k", "v");
    cluster.tick_n((cluster.config().t_tx + 2) as u32);

    let decisions = cluster.logger.coordinator_decisions_for(trans_id);
    assert_eq!(decisions.len(), 1);
    assert!(matches!(decisions[0], LogEvent::UpdateFail { .. }));
}

/// Scenario 6: after a topology change, a newly-joined node receives
/// stabilization pushes for keys it has become a replica for.
#[test]
fn stabilization_after_join_populates_new_replica() {
    let mut cluster = Cluster::new(3, fast_config());
    cluster.bootstrap(0);
    cluster.bootstrap(1);
    cluster.tick_n(3);

    cluster.client_create(0, "k", "v");
    cluster.tick_n(3);

    // Node 2 joins late; once the ring changes, it should get pushed a
    // copy of any key whose replica set now includes it.
    cluster.bootstrap(2);
    cluster.tick_n(4);

    let c = cluster.address(2);
    let replicas_now = cluster.nodes[0].ring().find_replicas("k", cluster.config().ring_size, 3);
    if replicas_now.contains(&c) {
        let node2 = cluster.nodes.iter().find(|n| n.address() == c).unwrap();
        assert_eq!(node2.kv().store().read("k"), "v");
    }
}
