//! In-process chat relay used by the integration tests.
//!
//! Accepts WebSocket connections on `/ws`, records every text frame it
//! receives and forwards it to all other connected clients. Tests can also
//! inject raw frames and force-close every connection.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

enum RelayFrame {
    Text(String),
    Close,
}

#[derive(Default)]
struct RelayState {
    clients: Mutex<HashMap<u64, mpsc::UnboundedSender<RelayFrame>>>,
    received: Mutex<Vec<String>>,
    next_id: AtomicU64,
    total_connections: AtomicU64,
    /// Frame sent to every client right after the upgrade.
    greeting: Option<String>,
}

pub struct TestRelay {
    addr: SocketAddr,
    state: Arc<RelayState>,
    task: JoinHandle<()>,
}

impl TestRelay {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind relay");
        Self::serve(listener)
    }

    /// Start serving on an already bound listener. Connections waiting in its
    /// backlog are accepted and upgraded.
    pub fn serve(listener: tokio::net::TcpListener) -> Self {
        Self::serve_with(listener, None)
    }

    /// Like [`start`](Self::start), but greet each new connection with `frame`.
    pub async fn start_with_greeting(frame: String) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind relay");
        Self::serve_with(listener, Some(frame))
    }

    fn serve_with(listener: tokio::net::TcpListener, greeting: Option<String>) -> Self {
        let state = Arc::new(RelayState {
            greeting,
            ..RelayState::default()
        });
        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .with_state(state.clone());

        let addr = listener.local_addr().expect("Failed to read relay address");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Relay stopped");
        });

        Self { addr, state, task }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Send a raw text frame to every connected client.
    pub async fn inject(&self, text: &str) {
        let clients = self.state.clients.lock().await;
        for tx in clients.values() {
            let _ = tx.send(RelayFrame::Text(text.to_string()));
        }
    }

    /// Close every open connection from the relay side.
    pub async fn disconnect_all(&self) {
        let clients = self.state.clients.lock().await;
        for tx in clients.values() {
            let _ = tx.send(RelayFrame::Close);
        }
    }

    pub async fn client_count(&self) -> usize {
        self.state.clients.lock().await.len()
    }

    /// Number of connections accepted since start.
    pub fn total_connections(&self) -> u64 {
        self.state.total_connections.load(Ordering::SeqCst)
    }

    pub async fn received(&self) -> Vec<String> {
        self.state.received.lock().await.clone()
    }

    pub async fn wait_for_clients(&self, count: usize) {
        let result = tokio::time::timeout(WAIT_TIMEOUT, async {
            while self.client_count().await != count {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await;
        assert!(result.is_ok(), "expected {count} connected clients");
    }

    pub async fn wait_for_total_connections(&self, count: u64) {
        let result = tokio::time::timeout(WAIT_TIMEOUT, async {
            while self.total_connections() < count {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await;
        assert!(result.is_ok(), "expected {count} accepted connections");
    }

    /// Wait until at least `count` frames were received and return them all.
    pub async fn wait_for_received(&self, count: usize) -> Vec<String> {
        let result = tokio::time::timeout(WAIT_TIMEOUT, async {
            loop {
                let received = self.received().await;
                if received.len() >= count {
                    return received;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        })
        .await;
        result.unwrap_or_else(|_| panic!("expected {count} received frames"))
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Build a `message` frame the way the relay forwards it.
pub fn message_frame(text: &str, sender: &str, time: &str) -> String {
    serde_json::json!({"type": "message", "text": text, "sender": sender, "time": time})
        .to_string()
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RelayState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<RelayState>) {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let (tx, mut rx) = mpsc::unbounded_channel();
    if let Some(greeting) = &state.greeting {
        let _ = tx.send(RelayFrame::Text(greeting.clone()));
    }
    state.clients.lock().await.insert(id, tx);
    state.total_connections.fetch_add(1, Ordering::SeqCst);

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                RelayFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                RelayFrame::Close => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let text = text.to_string();
                    recv_state.received.lock().await.push(text.clone());
                    let clients = recv_state.clients.lock().await;
                    for (client_id, tx) in clients.iter() {
                        if *client_id != id {
                            let _ = tx.send(RelayFrame::Text(text.clone()));
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.clients.lock().await.remove(&id);
}
