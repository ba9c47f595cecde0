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

use ringkv_core::Address;
use ringkv_core::CoreError;
use ringkv_core::LogicalTime;
use ringkv_core::MemberEntry;

/// Ordinal position within a key's three-node replica set, carried on
/// every KV request frame per `spec.md` §3/§6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaRole {
    Primary,
    Secondary,
    Tertiary,
}

impl ReplicaRole {
    fn as_str(self) -> &'static str {
        match self {
            ReplicaRole::Primary => "PRIMARY",
            ReplicaRole::Secondary => "SECONDARY",
            ReplicaRole::Tertiary => "TERTIARY",
        }
    }

    fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "PRIMARY" => Ok(ReplicaRole::Primary),
            "SECONDARY" => Ok(ReplicaRole::Secondary),
            "TERTIARY" => Ok(ReplicaRole::Tertiary),
            other => Err(CoreError::Decode(format!("unknown replica role: {other}"))),
        }
    }

    /// The role of the node at ring position `index` of 0..3 among a
    /// key's three replicas, in ring order.
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => ReplicaRole::Primary,
            1 => ReplicaRole::Secondary,
            _ => ReplicaRole::Tertiary,
        }
    }
}

/// A tagged message value, dispatched by pattern match per `spec.md`
/// §9's "polymorphism over message types" guidance. Membership variants
/// (`JoinReq`/`JoinRep`/`Ping`) each carry the sender's address, its
/// current heartbeat, and its full membership list; KV variants carry
/// the fields listed in §3.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    JoinReq {
        from: Address,
        heartbeat: i64,
        members: Vec<MemberEntry>,
    },
    JoinRep {
        from: Address,
        heartbeat: i64,
        members: Vec<MemberEntry>,
    },
    Ping {
        from: Address,
        heartbeat: i64,
        members: Vec<MemberEntry>,
    },
    Create {
        trans_id: i64,
        from: Address,
        key: String,
        value: String,
        role: ReplicaRole,
    },
    Read {
        trans_id: i64,
        from: Address,
        key: String,
        role: ReplicaRole,
    },
    Update {
        trans_id: i64,
        from: Address,
        key: String,
        value: String,
        role: ReplicaRole,
    },
    Delete {
        trans_id: i64,
        from: Address,
        key: String,
        role: ReplicaRole,
    },
    Reply {
        trans_id: i64,
        from: Address,
        success: bool,
    },
    ReadReply {
        trans_id: i64,
        from: Address,
        value: String,
    },
}

impl Message {
    pub fn encode(&self) -> String {
        match self {
            Message::JoinReq {
                from,
                heartbeat,
                members,
            } => encode_membership("JOINREQ", *from, *heartbeat, members),
            Message::JoinRep {
                from,
                heartbeat,
                members,
            } => encode_membership("JOINREP", *from, *heartbeat, members),
            Message::Ping {
                from,
                heartbeat,
                members,
            } => encode_membership("PING", *from, *heartbeat, members),
            Message::Create {
                trans_id,
                from,
                key,
                value,
                role,
            } => format!("{trans_id}::{from}::CREATE::{key}::{value}::{}", role.as_str()),
            Message::Update {
                trans_id,
                from,
                key,
                value,
                role,
            } => format!("{trans_id}::{from}::UPDATE::{key}::{value}::{}", role.as_str()),
            Message::Read {
                trans_id,
                from,
                key,
                role,
            } => format!("{trans_id}::{from}::READ::{key}::{}", role.as_str()),
            Message::Delete {
                trans_id,
                from,
                key,
                role,
            } => format!("{trans_id}::{from}::DELETE::{key}::{}", role.as_str()),
            Message::Reply {
                trans_id,
                from,
                success,
            } => format!("{trans_id}::{from}::REPLY::{success}"),
            Message::ReadReply {
                trans_id,
                from,
                value,
            } => format!("{trans_id}::{from}::READREPLY::{value}"),
        }
    }

    pub fn decode(frame: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = frame.split("::").collect();
        let tag = *parts
            .first()
            .ok_or_else(|| CoreError::Decode("empty frame".to_string()))?;

        match tag {
            "JOINREQ" | "JOINREP" | "PING" => decode_membership(tag, &parts),
            _ => decode_kv(&parts),
        }
    }
}

fn encode_membership(tag: &str, from: Address, heartbeat: i64, members: &[MemberEntry]) -> String {
    let member_list = members
        .iter()
        .map(|m| format!("{},{},{},{}", m.address.id, m.address.port, m.heartbeat, m.timestamp))
        .collect::<Vec<_>>()
        .join(";");
    format!("{tag}::{from}::{heartbeat}::{member_list}")
}

fn decode_membership(tag: &str, parts: &[&str]) -> Result<Message, CoreError> {
    let [_, from, heartbeat, member_list] = parts else {
        return Err(CoreError::Decode(format!("malformed {tag} frame")));
    };
    let from: Address = from
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed {tag} sender address: {from}")))?;
    let heartbeat: i64 = heartbeat
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed {tag} heartbeat: {heartbeat}")))?;
    let members = decode_member_list(member_list)?;

    Ok(match tag {
        "JOINREQ" => Message::JoinReq {
            from,
            heartbeat,
            members,
        },
        "JOINREP" => Message::JoinRep {
            from,
            heartbeat,
            members,
        },
        "PING" => Message::Ping {
            from,
            heartbeat,
            members,
        },
        _ => unreachable!("tag already matched in Message::decode"),
    })
}

fn decode_member_list(s: &str) -> Result<Vec<MemberEntry>, CoreError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(';').map(decode_member_tuple).collect()
}

fn decode_member_tuple(s: &str) -> Result<MemberEntry, CoreError> {
    let fields: Vec<&str> = s.split(',').collect();
    let [id, port, heartbeat, timestamp] = fields.as_slice() else {
        return Err(CoreError::Decode(format!("malformed member tuple: {s}")));
    };
    let id: u32 = id
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed member id: {id}")))?;
    let port: u16 = port
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed member port: {port}")))?;
    let heartbeat: i64 = heartbeat
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed member heartbeat: {heartbeat}")))?;
    let timestamp: LogicalTime = timestamp
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed member timestamp: {timestamp}")))?;
    Ok(MemberEntry::new(Address::new(id, port), heartbeat, timestamp))
}

fn decode_kv(parts: &[&str]) -> Result<Message, CoreError> {
    if parts.len() < 3 {
        return Err(CoreError::Decode(format!("malformed kv frame: {}", parts.join("::"))));
    }
    let trans_id: i64 = parts[0]
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed trans_id: {}", parts[0])))?;
    let from: Address = parts[1]
        .parse()
        .map_err(|_| CoreError::Decode(format!("malformed sender address: {}", parts[1])))?;
    let op = parts[2];

    match op {
        "CREATE" | "UPDATE" => {
            let [_, _, _, key, value, role] = parts else {
                return Err(CoreError::Decode(format!("malformed {op} frame")));
            };
            let role = ReplicaRole::parse(role)?;
            let (key, value) = ((*key).to_string(), (*value).to_string());
            Ok(if op == "CREATE" {
                Message::Create {
                    trans_id,
                    from,
                    key,
                    value,
                    role,
                }
            } else {
                Message::Update {
                    trans_id,
                    from,
                    key,
                    value,
                    role,
                }
            })
        }
        "READ" | "DELETE" => {
            let [_, _, _, key, role] = parts else {
                return Err(CoreError::Decode(format!("malformed {op} frame")));
            };
            let role = ReplicaRole::parse(role)?;
            let key = (*key).to_string();
            Ok(if op == "READ" {
                Message::Read {
                    trans_id,
                    from,
                    key,
                    role,
                }
            } else {
                Message::Delete {
                    trans_id,
                    from,
                    key,
                    role,
                }
            })
        }
        "REPLY" => {
            let [_, _, _, success] = parts else {
                return Err(CoreError::Decode("malformed REPLY frame".to_string()));
            };
            let success = success
                .parse()
                .map_err(|_| CoreError::Decode(format!("malformed REPLY success flag: {success}")))?;
            Ok(Message::Reply {
                trans_id,
                from,
                success,
            })
        }
        "READREPLY" => {
            let [_, _, _, value] = parts else {
                return Err(CoreError::Decode("malformed READREPLY frame".to_string()));
            };
            Ok(Message::ReadReply {
                trans_id,
                from,
                value: (*value).to_string(),
            })
        }
        other => Err(CoreError::Decode(format!("unknown message type: {other}"))),
    }
}
