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

/// Errors raised by the shared domain layer: malformed wire frames and
/// invalid configuration. Follows the same one-small-enum-per-crate
/// convention `percas-gossip`/`percas-server` use for their own
/// crate-local errors, implemented with `thiserror` since this crate
/// has more than one variant worth distinguishing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("failed to decode frame: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
