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

use crate::address::Address;

/// The simulated network shim named in `spec.md` §6: best-effort delivery
/// of opaque byte buffers between node addresses, with no delivery
/// receipts. Loss, delay and reordering are all legal; per-sender
/// ordering must not be assumed by callers.
///
/// Draining delivered bytes into a node's inbound queue is the harness's
/// job, not this trait's — a `Node` only ever calls `send`.
pub trait Network {
    fn send(&mut self, from: Address, to: Address, bytes: Vec<u8>);
}
