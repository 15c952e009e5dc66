use std::sync::Arc;
use tokio::sync::Mutex;

use crate::filter::ContentFilter;
use crate::gateway::dispatcher::Dispatcher;
use crate::gateway::heartbeat::Heartbeat;
use crate::gateway::protocol::Relay;
use crate::routes::assets::DocumentRoot;
use crate::token::TokenAuthority;

#[derive(Clone)]
pub struct AppState {
    /// Single writer for all session state.
    pub relay: Arc<Mutex<Relay>>,
    pub assets: Arc<DocumentRoot>,
    pub heartbeat: Heartbeat,
}

impl AppState {
    pub fn new(tokens: TokenAuthority, filter: ContentFilter, assets: DocumentRoot) -> Self {
        let relay = Relay::new(tokens, filter, Arc::new(Dispatcher::new()));
        Self {
            relay: Arc::new(Mutex::new(relay)),
            assets: Arc::new(assets),
            heartbeat: Heartbeat::default(),
        }
    }

    pub fn with_heartbeat(mut self, heartbeat: Heartbeat) -> Self {
        self.heartbeat = heartbeat;
        self
    }
}
