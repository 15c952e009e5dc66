use std::sync::Arc;
use tokio::sync::mpsc;

use super::dispatcher::Dispatcher;
use super::events::{ClientEvent, JoinData, MemberRef, PostData, QuitData, ServerEvent};
use crate::filter::ContentFilter;
use crate::registry::{ConnectionId, Registry, SessionState};
use crate::token::TokenAuthority;

/// The join/post/quit state machine.
///
/// Every handler takes `&mut self` and runs to completion, so callers that
/// share a `Relay` between sockets must hold it behind a single lock.
pub struct Relay {
    registry: Registry,
    tokens: TokenAuthority,
    filter: ContentFilter,
    dispatcher: Arc<Dispatcher>,
}

impl Relay {
    pub fn new(tokens: TokenAuthority, filter: ContentFilter, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            registry: Registry::new(),
            tokens,
            filter,
            dispatcher,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn verify(&self, connection_id: &ConnectionId, token: &str) -> bool {
        self.tokens.verify(&self.registry, connection_id, token)
    }

    /// Register a freshly opened socket and hand it its token.
    pub fn connect(&mut self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<String>) {
        let token = self.tokens.issue(&connection_id);
        self.dispatcher.attach(connection_id.clone(), tx);
        let sequence = self
            .registry
            .register(connection_id.clone(), token.clone())
            .sequence;

        tracing::info!(
            connection = %connection_id,
            sequence,
            online = self.registry.session_count(),
            "connected"
        );
        self.send_to_self(&connection_id, &ServerEvent::Token { token });
    }

    /// Transport-level loss of the socket. Peers are not notified.
    pub fn disconnect(&mut self, connection_id: &ConnectionId) {
        if let Some(session) = self.registry.remove(connection_id) {
            tracing::info!(
                connection = %connection_id,
                sequence = session.sequence,
                "disconnected"
            );
        }
        self.dispatcher.detach(connection_id);
    }

    pub fn handle(&mut self, connection_id: &ConnectionId, event: ClientEvent) {
        let state = self.registry.state(connection_id);
        match (event, state) {
            (ClientEvent::Join(data), SessionState::Joined) => {
                tracing::debug!(connection = %connection_id, name = %data.name, "join while already joined");
                self.send_to_self(connection_id, &join_failed());
            }
            (ClientEvent::Join(data), _) => self.join(connection_id, data),
            (ClientEvent::Post(data), SessionState::Joined) => self.post(connection_id, data),
            (ClientEvent::Post(_), state) => {
                tracing::debug!(connection = %connection_id, ?state, "post dropped: not joined");
            }
            (ClientEvent::Quit(data), _) => self.quit(connection_id, data),
        }
    }

    fn join(&mut self, connection_id: &ConnectionId, data: JoinData) {
        let sequence = match self
            .tokens
            .authenticate(&self.registry, connection_id, &data.token)
        {
            Ok(session) => session.sequence,
            Err(e) => {
                tracing::debug!(connection = %connection_id, "join rejected: {e}");
                self.send_to_self(connection_id, &join_failed());
                return;
            }
        };

        // Snapshot before the joiner's own name is set.
        let members = self.registry.list_joined();
        self.registry.set_name(connection_id, data.name.clone());

        tracing::info!(connection = %connection_id, sequence, name = %data.name, "joined");

        self.send_to_self(
            connection_id,
            &ServerEvent::JoinResult {
                status: true,
                list: Some(members),
            },
        );
        self.send_to_self(
            connection_id,
            &ServerEvent::MemberJoin {
                name: data.name.clone(),
                token: MemberRef::Token(data.token),
            },
        );
        self.send_to_others(
            connection_id,
            &ServerEvent::MemberJoin {
                name: data.name,
                token: MemberRef::Sequence(sequence),
            },
        );
    }

    fn post(&mut self, connection_id: &ConnectionId, data: PostData) {
        let sequence = match self
            .tokens
            .authenticate(&self.registry, connection_id, &data.token)
        {
            Ok(session) => session.sequence,
            Err(e) => {
                tracing::debug!(connection = %connection_id, "post dropped: {e}");
                return;
            }
        };

        let text = self.filter.apply(&data.text);

        self.send_to_self(
            connection_id,
            &ServerEvent::MemberPost {
                text: text.clone(),
                token: MemberRef::Token(data.token),
            },
        );
        self.send_to_others(
            connection_id,
            &ServerEvent::MemberPost {
                text,
                token: MemberRef::Sequence(sequence),
            },
        );
    }

    fn quit(&mut self, connection_id: &ConnectionId, data: QuitData) {
        let sequence = match self
            .tokens
            .authenticate(&self.registry, connection_id, &data.token)
        {
            Ok(session) => session.sequence,
            Err(e) => {
                tracing::debug!(connection = %connection_id, "quit rejected: {e}");
                self.send_to_self(connection_id, &ServerEvent::QuitResult { status: false });
                return;
            }
        };

        self.send_to_self(connection_id, &ServerEvent::QuitResult { status: true });
        self.send_to_others(connection_id, &ServerEvent::MemberQuit { token: sequence });
        self.registry.remove(connection_id);

        tracing::info!(connection = %connection_id, sequence, "quit");
    }

    fn send_to_self(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        self.dispatcher.send(connection_id, &event.to_json());
    }

    /// Deliver to every registered connection except the sender.
    fn send_to_others(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        let frame = event.to_json();
        for recipient in self.registry.connection_ids() {
            if recipient != connection_id {
                self.dispatcher.send(recipient, &frame);
            }
        }
    }
}

fn join_failed() -> ServerEvent {
    ServerEvent::JoinResult {
        status: false,
        list: None,
    }
}
