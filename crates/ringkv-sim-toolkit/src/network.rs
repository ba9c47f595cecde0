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
use std::collections::VecDeque;

use ringkv_core::Address;
use ringkv_core::LogicalTime;
use ringkv_core::Network;

struct PendingFrame {
    deliver_at: LogicalTime,
    bytes: Vec<u8>,
}

/// The simulated network shim named in `spec.md` §6: best-effort
/// delivery of opaque byte buffers between node addresses, with
/// optional configurable loss and delay for exercising the fault
/// scenarios in §8. `Network::send` only schedules a frame; actually
/// handing it to a `Node`'s inbox (the "recv" half of the shim) is the
/// harness's job, driven by [`SimNetwork::drain_ready`] once per tick.
///
/// Loss is decided by a small xorshift64 generator seeded at
/// construction, not the `rand` crate: the engine crates take no
/// dependency on randomness at all (gossip is full-view, never
/// sampled), and a harness-only PRNG keeps that true of the whole
/// workspace bar this one test/demo collaborator.
pub struct SimNetwork {
    now: LogicalTime,
    loss_rate: f64,
    delay: LogicalTime,
    rng_state: u64,
    pending: HashMap<Address, VecDeque<PendingFrame>>,
}

impl SimNetwork {
    pub fn new() -> Self {
        Self {
            now: 0,
            loss_rate: 0.0,
            delay: 0,
            rng_state: 0x9E3779B97F4A7C15,
            pending: HashMap::new(),
        }
    }

    /// Fraction of sent frames dropped in transit, in `[0.0, 1.0]`.
    pub fn with_loss_rate(mut self, loss_rate: f64) -> Self {
        self.loss_rate = loss_rate.clamp(0.0, 1.0);
        self
    }

    /// Extra ticks a frame waits before becoming deliverable.
    pub fn with_delay(mut self, delay: LogicalTime) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_state = seed.max(1);
        self
    }

    /// Advances the network's notion of "now"; frames sent afterwards
    /// are scheduled relative to this tick. Call once per simulation
    /// step, before ticking any node.
    pub fn set_now(&mut self, now: LogicalTime) {
        self.now = now;
    }

    /// Returns (and removes) every frame addressed to `to` whose
    /// delivery tick has arrived, in send order. Callers feed each one
    /// to `Node::enqueue`.
    pub fn drain_ready(&mut self, to: Address, now: LogicalTime) -> Vec<Vec<u8>> {
        let Some(queue) = self.pending.get_mut(&to) else {
            return Vec::new();
        };
        let mut ready = Vec::new();
        let mut remaining = VecDeque::new();
        for frame in queue.drain(..) {
            if frame.deliver_at <= now {
                ready.push(frame.bytes);
            } else {
                remaining.push_back(frame);
            }
        }
        *queue = remaining;
        ready
    }

    /// Total frames still in flight across all destinations, for tests
    /// asserting nothing is silently stuck forever.
    pub fn in_flight(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }

    fn next_f64(&mut self) -> f64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        (x >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl Default for SimNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl Network for SimNetwork {
    fn send(&mut self, from: Address, to: Address, bytes: Vec<u8>) {
        if self.loss_rate > 0.0 && self.next_f64() < self.loss_rate {
            log::debug!("sim-network dropping frame {from} -> {to}");
            return;
        }
        let deliver_at = self.now + self.delay;
        self.pending.entry(to).or_default().push_back(PendingFrame { deliver_at, bytes });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(id: u32) -> Address {
        Address::new(id, 0)
    }

    #[test]
    fn delivered_frame_is_queued_for_recipient() {
        let mut net = SimNetwork::new();
        net.send(addr(1), addr(2), b"hello".to_vec());
        assert_eq!(net.drain_ready(addr(2), 0), vec![b"hello".to_vec()]);
        assert!(net.drain_ready(addr(2), 0).is_empty());
    }

    #[test]
    fn delay_holds_frames_back_until_due() {
        let mut net = SimNetwork::new().with_delay(3);
        net.set_now(0);
        net.send(addr(1), addr(2), b"hello".to_vec());
        assert!(net.drain_ready(addr(2), 1).is_empty());
        assert!(net.drain_ready(addr(2), 2).is_empty());
        assert_eq!(net.drain_ready(addr(2), 3), vec![b"hello".to_vec()]);
    }

    #[test]
    fn full_loss_rate_drops_every_frame() {
        let mut net = SimNetwork::new().with_loss_rate(1.0);
        for _ in 0..10 {
            net.send(addr(1), addr(2), b"x".to_vec());
        }
        assert_eq!(net.in_flight(), 0);
        assert!(net.drain_ready(addr(2), 0).is_empty());
    }

    #[test]
    fn zero_loss_rate_delivers_every_frame() {
        let mut net = SimNetwork::new().with_loss_rate(0.0);
        for _ in 0..25 {
            net.send(addr(1), addr(2), b"x".to_vec());
        }
        assert_eq!(net.drain_ready(addr(2), 0).len(), 25);
    }
}
