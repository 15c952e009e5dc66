use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::registry::ConnectionId;

/// Outbound queues of every open socket.
pub struct Dispatcher {
    outbound: DashMap<ConnectionId, mpsc::UnboundedSender<String>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            outbound: DashMap::new(),
        }
    }

    pub fn attach(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<String>) {
        self.outbound.insert(connection_id, tx);
    }

    pub fn detach(&self, connection_id: &ConnectionId) {
        self.outbound.remove(connection_id);
    }

    /// Queue a frame for one connection. Closed or unknown queues drop it.
    pub fn send(&self, connection_id: &ConnectionId, frame: &str) {
        if let Some(tx) = self.outbound.get(connection_id) {
            let _ = tx.send(frame.to_string());
        }
    }
}
