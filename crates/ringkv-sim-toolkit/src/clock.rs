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

use ringkv_core::Clock;
use ringkv_core::LogicalTime;

/// A harness-advanced logical clock: a plain non-decreasing counter,
/// matching `spec.md` §6's "`now()` returns the current discrete
/// logical time". Nothing ticks it on its own; the simulation loop
/// calls [`SimClock::advance`] once per step before driving any node.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: LogicalTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self { now: 0 }
    }

    pub fn advance(&mut self) -> LogicalTime {
        self.now += 1;
        self.now
    }
}

impl Clock for SimClock {
    fn now(&self) -> LogicalTime {
        self.now
    }
}
