use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::SessionError;
use crate::registry::{ConnectionId, Registry, Session};

/// Derives and checks per-connection tokens.
///
/// A token is `sha256(secret || connection_id)` in lowercase hex. Tokens do
/// not expire; they die with the session they were issued for.
pub struct TokenAuthority {
    secret: String,
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl TokenAuthority {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, connection_id: &ConnectionId) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(connection_id.as_str().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Resolve the session a request claims to come from.
    pub fn authenticate<'r>(
        &self,
        registry: &'r Registry,
        connection_id: &ConnectionId,
        candidate: &str,
    ) -> Result<&'r Session, SessionError> {
        let session = registry
            .get(connection_id)
            .ok_or(SessionError::UnknownConnection)?;
        if constant_time_eq(session.token.as_bytes(), candidate.as_bytes()) {
            Ok(session)
        } else {
            Err(SessionError::AuthFailure)
        }
    }

    pub fn verify(&self, registry: &Registry, connection_id: &ConnectionId, candidate: &str) -> bool {
        self.authenticate(registry, connection_id, candidate).is_ok()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
