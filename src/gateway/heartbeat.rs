use std::time::Duration;

/// How often the server pings each socket.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);
/// Silence after which a socket counts as lost.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Liveness settings applied to every gateway socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            interval: HEARTBEAT_INTERVAL,
            timeout: HEARTBEAT_TIMEOUT,
        }
    }
}
