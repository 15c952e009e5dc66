use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque identifier the transport assigns to a connection when it opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a connection sits in the join/quit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Joined,
    Terminated,
}

/// Server-side record for one live connection.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub token: String,
    pub display_name: Option<String>,
    pub sequence: u64,
}

impl Session {
    pub fn is_joined(&self) -> bool {
        self.display_name.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_joined() {
            SessionState::Joined
        } else {
            SessionState::Connected
        }
    }
}

/// Entry of the member list handed to a joining client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberEntry {
    #[serde(rename = "token")]
    pub sequence: u64,
    pub name: String,
}

/// Live sessions keyed by connection, plus the sequence counter.
///
/// Sessions are stored by sequence number. Sequence numbers are handed out in
/// registration order and never reused, so iterating `sessions` walks
/// connections in the order they registered.
#[derive(Debug)]
pub struct Registry {
    sessions: BTreeMap<u64, Session>,
    by_connection: HashMap<ConnectionId, u64>,
    next_sequence: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            sessions: BTreeMap::new(),
            by_connection: HashMap::new(),
            next_sequence: 1,
        }
    }

    /// Create the session for a newly opened connection.
    ///
    /// Registering a connection id that is already live replaces its session
    /// with a fresh one under a new sequence number.
    pub fn register(&mut self, connection_id: ConnectionId, token: String) -> &Session {
        self.remove(&connection_id);

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.by_connection.insert(connection_id.clone(), sequence);
        self.sessions.entry(sequence).or_insert(Session {
            connection_id,
            token,
            display_name: None,
            sequence,
        })
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Session> {
        let sequence = self.by_connection.get(connection_id)?;
        self.sessions.get(sequence)
    }

    pub fn state(&self, connection_id: &ConnectionId) -> SessionState {
        self.get(connection_id)
            .map(Session::state)
            .unwrap_or(SessionState::Terminated)
    }

    /// Set the display name. Returns `false` if no session exists.
    pub fn set_name(&mut self, connection_id: &ConnectionId, name: String) -> bool {
        let Some(sequence) = self.by_connection.get(connection_id) else {
            return false;
        };
        match self.sessions.get_mut(sequence) {
            Some(session) => {
                session.display_name = Some(name);
                true
            }
            None => false,
        }
    }

    /// Delete the session, returning it if one existed.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Session> {
        let sequence = self.by_connection.remove(connection_id)?;
        self.sessions.remove(&sequence)
    }

    /// Joined members in registration order.
    pub fn list_joined(&self) -> Vec<MemberEntry> {
        self.sessions
            .values()
            .filter_map(|session| {
                session.display_name.as_ref().map(|name| MemberEntry {
                    sequence: session.sequence,
                    name: name.clone(),
                })
            })
            .collect()
    }

    /// Every registered connection in registration order.
    pub fn connection_ids(&self) -> impl Iterator<Item = &ConnectionId> {
        self.sessions.values().map(|session| &session.connection_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
