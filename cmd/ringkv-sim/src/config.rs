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

use std::path::Path;

use exn::Result;
use exn::ResultExt;
use ringkv_core::ClusterConfig;

use crate::Error;

/// Loads a [`ClusterConfig`] from an optional TOML file, falling back to
/// the spec's default tunables when no file is given. Scaled-down
/// counterpart of `cmd/percas::config::load_config`'s layered-TOML
/// loader: this program has five scalar tunables and no per-field
/// environment-variable surface, so there is no env-overlay layer to
/// reproduce.
pub fn load_config(path: Option<&Path>) -> Result<ClusterConfig, Error> {
    let Some(path) = path else {
        return Ok(ClusterConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .or_raise(|| Error(format!("failed to read config file: {}", path.display())))?;
    toml::from_str(&content).or_raise(|| Error(format!("failed to parse config file: {}", path.display())))
}
