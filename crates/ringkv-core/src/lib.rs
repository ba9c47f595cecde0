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

//! Shared domain types and external-interface traits for ringkv: the
//! `Address`/`MemberEntry` data model, the `Clock`/`Network`/`Logger`
//! collaborator traits, cluster configuration, and the crate's error type.

mod address;
mod config;
mod error;
mod logger;
mod member;
mod network;
mod time;

pub use address::Address;
pub use config::ClusterConfig;
pub use error::CoreError;
pub use logger::Logger;
pub use member::MemberEntry;
pub use member::MemberStatus;
pub use member::MemberView;
pub use network::Network;
pub use time::Clock;
pub use time::LogicalTime;
