pub mod dispatcher;
pub mod events;
pub mod heartbeat;
pub mod protocol;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::registry::ConnectionId;
use crate::state::AppState;
use events::ClientEvent;

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let connection_id = ConnectionId::generate();

    // Channel for sending messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.relay.lock().await.connect(connection_id.clone(), tx);

    let heartbeat = state.heartbeat;
    let mut last_seen = Instant::now();
    let mut heartbeat_interval =
        tokio::time::interval_at(Instant::now() + heartbeat.interval, heartbeat.interval);

    loop {
        tokio::select! {
            // Outgoing frames queued by the relay
            Some(frame) = rx.recv() => {
                if ws_sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            _ = heartbeat_interval.tick() => {
                if last_seen.elapsed() > heartbeat.timeout {
                    tracing::debug!(connection = %connection_id, "heartbeat timed out");
                    break;
                }
                if ws_sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            // Incoming frames
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        last_seen = Instant::now();
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(event) => {
                                tracing::debug!(connection = %connection_id, event = event.name(), "received");
                                state.relay.lock().await.handle(&connection_id, event);
                            }
                            Err(e) => {
                                tracing::debug!(connection = %connection_id, "ignoring undecodable frame: {e}");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        last_seen = Instant::now();
                    }
                    Some(Err(e)) => {
                        tracing::debug!(connection = %connection_id, "socket error: {e}");
                        break;
                    }
                }
            }
        }
    }

    state.relay.lock().await.disconnect(&connection_id);
}
