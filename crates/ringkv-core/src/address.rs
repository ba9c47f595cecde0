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

use std::fmt;

/// A six-byte node identifier: a 4-byte id followed by a 2-byte port.
///
/// Equality, ordering and hashing are all byte-level over `(id, port)`,
/// which also gives the strictly-sorted cluster view and ring tie-break
/// rule their ordering for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Address {
    pub id: u32,
    pub port: u16,
}

impl Address {
    pub const fn new(id: u32, port: u16) -> Self {
        Self { id, port }
    }

    /// The fixed introducer address every bootstrapping node joins through.
    pub const INTRODUCER: Address = Address::new(1, 0);

    pub fn to_bytes(self) -> [u8; 6] {
        let mut buf = [0u8; 6];
        buf[0..4].copy_from_slice(&self.id.to_be_bytes());
        buf[4..6].copy_from_slice(&self.port.to_be_bytes());
        buf
    }

    pub fn from_bytes(buf: [u8; 6]) -> Self {
        let id = u32::from_be_bytes(buf[0..4].try_into().unwrap());
        let port = u16::from_be_bytes(buf[4..6].try_into().unwrap());
        Self { id, port }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.port)
    }
}

impl std::str::FromStr for Address {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, port) = s
            .split_once(':')
            .ok_or_else(|| crate::error::CoreError::Decode(format!("invalid address: {s}")))?;
        let id = id
            .parse()
            .map_err(|_| crate::error::CoreError::Decode(format!("invalid address id: {id}")))?;
        let port = port
            .parse()
            .map_err(|_| crate::error::CoreError::Decode(format!("invalid address port: {port}")))?;
        Ok(Address::new(id, port))
    }
}
