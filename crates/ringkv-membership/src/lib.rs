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

//! Gossip membership service (C3) and consistent-hash ring (C4) for
//! ringkv: heartbeat propagation, per-peer liveness tracking, bootstrap
//! via a fixed introducer, and ring-based key placement.

mod member;
mod ring;
mod service;

pub use member::MembershipView;
pub use member::MergeOutcome;
pub use ring::Ring;
pub use ring::RingNode;
pub use ring::hash_code;
pub use service::MembershipService;
