use serde::{Deserialize, Serialize};

use crate::registry::MemberEntry;

/// Frames sent by clients. Wire shape: `{"type": "join", "data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Join(JoinData),
    Post(PostData),
    Quit(QuitData),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Join(_) => "join",
            ClientEvent::Post(_) => "post",
            ClientEvent::Quit(_) => "quit",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinData {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuitData {
    #[serde(default)]
    pub token: String,
}

/// Who an event is about. The originating client sees its own token echoed
/// back, everyone else sees the public sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MemberRef {
    Token(String),
    Sequence(u64),
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Token {
        token: String,
    },
    JoinResult {
        status: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        list: Option<Vec<MemberEntry>>,
    },
    MemberJoin {
        name: String,
        token: MemberRef,
    },
    MemberPost {
        text: String,
        token: MemberRef,
    },
    MemberQuit {
        token: u64,
    },
    QuitResult {
        status: bool,
    },
}

impl ServerEvent {
    pub fn to_json(&self) -> String {
        // Every variant holds only strings, integers and bools.
        serde_json::to_string(self).unwrap_or_default()
    }
}
