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

//! External-collaborator implementations for ringkv's tests and demo
//! binary: an in-memory [`SimNetwork`] with optional configurable loss
//! and delay, a harness-advanced [`SimClock`], and two [`ringkv_core::
//! Logger`] implementations (`StdLogger` for the demo binary,
//! `RecordingLogger` for test assertions).

mod clock;
mod logger;
mod network;

pub use clock::SimClock;
pub use logger::LogEvent;
pub use logger::RecordingLogger;
pub use logger::StdLogger;
pub use network::SimNetwork;
