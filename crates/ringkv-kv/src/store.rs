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

/// The local store (C2): an in-memory `String -> String` map with CRUD.
/// Single owner, no concurrency, no versioning — exactly `spec.md`
/// §4.2. Grounded on `MP2Node.cpp`'s `createKeyValue`/`readKey`/
/// `updateKeyValue`/`deletekey`.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    map: HashMap<String, String>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails iff `key` already exists.
    pub fn create(&mut self, key: &str, value: &str) -> bool {
        if self.map.contains_key(key) {
            false
        } else {
            self.map.insert(key.to_string(), value.to_string());
            true
        }
    }

    /// Never fails; an absent key reads as an empty string.
    pub fn read(&self, key: &str) -> String {
        self.map.get(key).cloned().unwrap_or_default()
    }

    /// Fails iff `key` is absent.
    pub fn update(&mut self, key: &str, value: &str) -> bool {
        if let Some(existing) = self.map.get_mut(key) {
            *existing = value.to_string();
            true
        } else {
            false
        }
    }

    /// Fails iff `key` is absent.
    pub fn delete(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
