#![allow(dead_code)]

use chatrelay::filter::ContentFilter;
use chatrelay::gateway::heartbeat::Heartbeat;
use chatrelay::routes;
use chatrelay::routes::assets::DocumentRoot;
use chatrelay::state::AppState;
use chatrelay::token::TokenAuthority;
use futures_util::{SinkExt, StreamExt};
use std::path::PathBuf;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const TEST_SECRET: &str = "integration-test-secret";

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Create a scratch document root next to a file that must never be served.
pub fn temp_document_root() -> PathBuf {
    let mut base = std::env::temp_dir();
    base.push(format!("chatrelay-test-{}", uuid::Uuid::new_v4()));
    let public = base.join("public");
    std::fs::create_dir_all(&public).expect("failed to create document root");
    std::fs::write(public.join("index.html"), "<!doctype html><title>chat</title>").unwrap();
    std::fs::write(public.join("app.js"), "console.log('chat');").unwrap();
    std::fs::write(public.join("style.css"), "body { margin: 0 }").unwrap();
    std::fs::write(base.join("secret.txt"), "do not serve").unwrap();
    public
}

/// Test server with isolated state. Safe for parallel tests.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    pub fn new() -> Self {
        let state = AppState::new(
            TokenAuthority::new(TEST_SECRET),
            ContentFilter::builtin(),
            DocumentRoot::new(temp_document_root()),
        );
        Self { state }
    }

    /// Same as `new` but with a short ping interval and liveness timeout.
    pub fn with_heartbeat(interval_ms: u64, timeout_ms: u64) -> Self {
        let server = Self::new();
        let state = server.state.with_heartbeat(Heartbeat {
            interval: std::time::Duration::from_millis(interval_ms),
            timeout: std::time::Duration::from_millis(timeout_ms),
        });
        Self { state }
    }

    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    /// Binds a TCP listener on port 0, spawns the server, and returns the ws base URL.
    pub async fn spawn(&self) -> String {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("ws://127.0.0.1:{}", addr.port())
    }
}

pub fn test_app() -> axum::Router {
    TestServer::new().router()
}

/// A connected chat client that has already received its token.
pub struct TestClient {
    pub ws: Socket,
    pub token: String,
}

impl TestClient {
    pub async fn connect(url: &str) -> Self {
        let (mut ws, _) = connect_async(format!("{url}/ws")).await.unwrap();
        let hello = next_event(&mut ws).await;
        assert_eq!(hello["type"], "token", "expected token frame, got {hello}");
        let token = hello["data"]["token"].as_str().unwrap().to_string();
        Self { ws, token }
    }

    pub async fn send(&mut self, event: &str, data: serde_json::Value) {
        let frame = serde_json::json!({ "type": event, "data": data });
        self.ws
            .send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    pub async fn join(&mut self, name: &str) {
        let token = self.token.clone();
        self.send("join", serde_json::json!({ "token": token, "name": name }))
            .await;
    }

    pub async fn post(&mut self, text: &str) {
        let token = self.token.clone();
        self.send("post", serde_json::json!({ "token": token, "text": text }))
            .await;
    }

    pub async fn quit(&mut self) {
        let token = self.token.clone();
        self.send("quit", serde_json::json!({ "token": token })).await;
    }

    pub async fn recv(&mut self) -> serde_json::Value {
        next_event(&mut self.ws).await
    }

    /// Returns the next event if one arrives within `ms` milliseconds.
    pub async fn try_recv(&mut self, ms: u64) -> Option<serde_json::Value> {
        tokio::time::timeout(
            std::time::Duration::from_millis(ms),
            next_event(&mut self.ws),
        )
        .await
        .ok()
    }
}

/// Next JSON text frame, skipping control frames. Fails the test after 5s.
pub async fn next_event(ws: &mut Socket) -> serde_json::Value {
    let read = async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str::<serde_json::Value>(text.as_str()).unwrap();
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                other => panic!("expected text frame, got {other:?}"),
            }
        }
    };
    tokio::time::timeout(std::time::Duration::from_secs(5), read)
        .await
        .expect("timed out waiting for event")
}
