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

/// A single position on the consistent-hash ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingNode {
    pub address: Address,
    pub hash_code: u32,
}

/// Sorted sequence of `RingNode`, derived fresh on every recompute from
/// `MembershipView ∪ {self}`. Never authoritative on its own; ties on
/// equal `hash_code` are broken by address byte order (I3).
///
/// Grounded on `percas-gossip::HashRing`'s murmur3-based hashing, but
/// without virtual nodes: `spec.md` §3 models the ring as one entry per
/// node, not a replicated set of vnodes per node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ring {
    nodes: Vec<RingNode>,
}

/// `H(bytes) mod ring_size`, used for both node placement and key
/// placement so the two hash into the same space.
pub fn hash_code(bytes: &[u8], ring_size: u32) -> u32 {
    mur3::murmurhash3_x86_32(&mut &bytes[..], 0) % ring_size
}

impl Ring {
    /// Builds a ring from `addresses` (expected to already include the
    /// owning node's own address), sorted by `(hash_code, address)`.
    pub fn recompute(addresses: impl IntoIterator<Item = Address>, ring_size: u32) -> Self {
        let mut nodes: Vec<RingNode> = addresses
            .into_iter()
            .map(|address| RingNode {
                address,
                hash_code: hash_code(&address.to_bytes(), ring_size),
            })
            .collect();
        nodes.sort_by_key(|n| (n.hash_code, n.address));
        Ring { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[RingNode] {
        &self.nodes
    }

    /// Returns `replication_factor` consecutive ring nodes starting at
    /// the first node whose `hash_code >= H(key) mod ring_size`,
    /// wrapping modulo ring length. Returns an empty list if the ring
    /// has fewer than `replication_factor` nodes (quorum is then
    /// impossible). Grounded on `MP2Node.cpp::findNodes`.
    pub fn find_replicas(&self, key: &str, ring_size: u32, replication_factor: usize) -> Vec<Address> {
        if self.nodes.len() < replication_factor {
            return Vec::new();
        }
        let key_hash = hash_code(key.as_bytes(), ring_size);
        let start = self
            .nodes
            .iter()
            .position(|n| n.hash_code >= key_hash)
            .unwrap_or(0);

        (0..replication_factor)
            .map(|i| self.nodes[(start + i) % self.nodes.len()].address)
            .collect()
    }

    /// Whether `self` differs from `previous` per `spec.md` §4.4's
    /// topology-change detection: a different length, or any differing
    /// positional `hash_code`.
    pub fn changed_from(&self, previous: &Ring) -> bool {
        if self.nodes.len() != previous.nodes.len() {
            return true;
        }
        self.nodes
            .iter()
            .zip(previous.nodes.iter())
            .any(|(a, b)| a.hash_code != b.hash_code)
    }
}
