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

/// Discrete logical time, as ticked forward by the external driver.
pub type LogicalTime = i64;

/// Supplies the current logical time to a node. Implementations must
/// never return a value lower than a previously returned one.
pub trait Clock {
    fn now(&self) -> LogicalTime;
}
