//! Transport bridge handle and its background connection task.
//!
//! [`TransportBridge`] is a thin handle: `send` queues onto an unbounded
//! command channel and returns, inbound frames come back through the single
//! [`Subscription`]. The connection task owns the socket and runs the
//! connect/reconnect loop until teardown.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures_util::{SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite};

use crate::{
    domain::{Message, MessageTransport},
    infrastructure::dto::{decode_frame, encode_message},
};

use super::{
    config::TransportConfig,
    error::TransportError,
    state::ConnectionState,
    subscription::{InboundRegistry, Subscription},
};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Worker {
    task: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

/// Owner of the session's one connection to the relay.
pub struct TransportBridge {
    config: TransportConfig,
    cmd_tx: mpsc::UnboundedSender<Message>,
    /// Taken by the first `connect`; `None` afterwards.
    cmd_rx: Mutex<Option<mpsc::UnboundedReceiver<Message>>>,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    inbound: InboundRegistry,
    worker: Mutex<Option<Worker>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TransportBridge {
    pub fn new(config: TransportConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            cmd_tx,
            cmd_rx: Mutex::new(Some(cmd_rx)),
            state_tx: Arc::new(state_tx),
            inbound: InboundRegistry::default(),
            worker: Mutex::new(None),
        }
    }

    /// Start the connection task. Returns immediately; progress is visible
    /// through [`state`](Self::state) and [`watch_state`](Self::watch_state).
    ///
    /// Only the first call does anything, later calls (including calls after
    /// teardown) return `false`. Must be called from within a Tokio runtime.
    pub fn connect(&self) -> bool {
        let Some(cmd_rx) = lock(&self.cmd_rx).take() else {
            tracing::debug!("connect called again; connection task already started");
            return false;
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(connection_loop(
            self.config.clone(),
            cmd_rx,
            Arc::clone(&self.state_tx),
            self.inbound.clone(),
            shutdown_rx,
        ));
        *lock(&self.worker) = Some(Worker { task, shutdown_tx });

        tracing::info!(endpoint = %self.config.endpoint, "transport connection task started");
        true
    }

    /// Register the inbound handler, replacing any previous one.
    pub fn on_message(&self) -> Subscription {
        self.inbound.register()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Release the inbound registration and close the connection.
    ///
    /// The connection task gets `shutdown_timeout` to send a close frame; it
    /// is aborted after that. Safe to call more than once.
    pub async fn teardown(&self) {
        self.inbound.clear();

        let worker = lock(&self.worker).take();
        // a bridge that never connected cannot connect after teardown
        lock(&self.cmd_rx).take();

        if let Some(Worker {
            mut task,
            shutdown_tx,
        }) = worker
        {
            let _ = shutdown_tx.send(());
            match tokio::time::timeout(self.config.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    tracing::warn!("connection task terminated with join error: {join_err}");
                }
                Err(_) => {
                    tracing::warn!("connection task did not exit within timeout; aborting");
                    task.abort();
                }
            }
        }

        self.state_tx.send_replace(ConnectionState::Closed);
        tracing::info!("transport torn down");
    }
}

impl MessageTransport for TransportBridge {
    /// Queue `message` for the connection task. Never fails: after teardown
    /// the message is dropped with a log line.
    fn send(&self, message: &Message) {
        if self.cmd_tx.send(message.clone()).is_err() {
            tracing::warn!("transport closed; outbound message dropped");
        }
    }
}

impl Drop for TransportBridge {
    fn drop(&mut self) {
        if let Some(worker) = lock(&self.worker).take() {
            worker.task.abort();
        }
    }
}

impl std::fmt::Debug for TransportBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportBridge")
            .field("endpoint", &self.config.endpoint)
            .field("state", &self.state())
            .field("handler_registered", &self.inbound.is_registered())
            .finish()
    }
}

/// Why a connected session ended.
enum SessionEnd {
    Shutdown,
    Dropped(TransportError),
}

/// Queue an outbound message, evicting the oldest one when full.
fn buffer_outbound(pending: &mut VecDeque<Message>, message: Message, capacity: usize) {
    if pending.len() >= capacity.max(1) {
        pending.pop_front();
        tracing::warn!(capacity, "outbound buffer full; dropped oldest message");
    }
    pending.push_back(message);
}

async fn connection_loop(
    config: TransportConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<Message>,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    inbound: InboundRegistry,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut pending: VecDeque<Message> = VecDeque::new();

    'outer: loop {
        // sends queued before connect or during the last delay share the bound
        while let Ok(message) = cmd_rx.try_recv() {
            buffer_outbound(&mut pending, message, config.outbound_buffer);
        }

        state_tx.send_replace(ConnectionState::Connecting);

        let handshake = tokio::time::timeout(
            config.connect_timeout,
            tokio_tungstenite::connect_async(config.endpoint.as_str()),
        );
        tokio::pin!(handshake);
        let attempt = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break 'outer,
                result = &mut handshake => break result,
                cmd = cmd_rx.recv() => match cmd {
                    Some(message) => buffer_outbound(&mut pending, message, config.outbound_buffer),
                    None => break 'outer,
                },
            }
        };

        match attempt {
            Ok(Ok((socket, _response))) => {
                state_tx.send_replace(ConnectionState::Connected);
                tracing::info!(endpoint = %config.endpoint, "connected");

                match run_connected(
                    socket,
                    &mut cmd_rx,
                    &mut pending,
                    &inbound,
                    &mut shutdown_rx,
                )
                .await
                {
                    SessionEnd::Shutdown => break 'outer,
                    SessionEnd::Dropped(err) => {
                        tracing::warn!("connection dropped: {err}");
                    }
                }
            }
            Ok(Err(source)) => {
                let err = TransportError::Connect {
                    endpoint: config.endpoint.clone(),
                    source,
                };
                tracing::warn!("{err}");
            }
            Err(_elapsed) => {
                let err = TransportError::ConnectTimeout {
                    endpoint: config.endpoint.clone(),
                    timeout: config.connect_timeout,
                };
                tracing::warn!("{err}");
            }
        }

        state_tx.send_replace(ConnectionState::Disconnected);
        tracing::debug!(delay = ?config.reconnect_delay, "reconnecting after delay");

        // keep accepting sends while waiting so nothing blocks the caller
        let retry = tokio::time::sleep(config.reconnect_delay);
        tokio::pin!(retry);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break 'outer,
                _ = &mut retry => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(message) => buffer_outbound(&mut pending, message, config.outbound_buffer),
                    None => break 'outer,
                },
            }
        }
    }

    if !pending.is_empty() {
        tracing::warn!(count = pending.len(), "discarding unsent messages");
    }
    state_tx.send_replace(ConnectionState::Disconnected);
    tracing::debug!("connection task finished");
}

async fn run_connected(
    socket: Socket,
    cmd_rx: &mut mpsc::UnboundedReceiver<Message>,
    pending: &mut VecDeque<Message>,
    inbound: &InboundRegistry,
    shutdown_rx: &mut oneshot::Receiver<()>,
) -> SessionEnd {
    let (mut write, mut read) = socket.split();

    // flush what was queued while disconnected, oldest first
    while let Some(message) = pending.pop_front() {
        if let Err(err) = write_message(&mut write, &message).await {
            if matches!(err, TransportError::Send(_)) {
                pending.push_front(message);
                return SessionEnd::Dropped(err);
            }
            tracing::warn!("outbound message dropped: {err}");
        }
    }

    loop {
        tokio::select! {
            biased;
            _ = &mut *shutdown_rx => {
                if let Err(err) = write.send(tungstenite::Message::Close(None)).await {
                    tracing::debug!("failed to send close frame: {err}");
                }
                let _ = write.close().await;
                return SessionEnd::Shutdown;
            }
            cmd = cmd_rx.recv() => {
                let Some(message) = cmd else {
                    return SessionEnd::Shutdown;
                };
                if let Err(err) = write_message(&mut write, &message).await {
                    if matches!(err, TransportError::Send(_)) {
                        pending.push_front(message);
                        return SessionEnd::Dropped(err);
                    }
                    tracing::warn!("outbound message dropped: {err}");
                }
            }
            frame = read.next() => match frame {
                Some(Ok(tungstenite::Message::Text(text))) => {
                    tracing::debug!("received frame: {}", text.as_str());
                    match decode_frame(text.as_str()) {
                        Ok(message) => {
                            inbound.deliver(message);
                        }
                        Err(err) => tracing::warn!("ignoring inbound frame: {err}"),
                    }
                }
                Some(Ok(tungstenite::Message::Close(_))) => {
                    return SessionEnd::Dropped(TransportError::Closed);
                }
                Some(Ok(_)) => {
                    // binary, ping and pong frames carry no chat events
                }
                Some(Err(err)) => return SessionEnd::Dropped(TransportError::Receive(err)),
                None => return SessionEnd::Dropped(TransportError::Closed),
            },
        }
    }
}

async fn write_message<S>(write: &mut S, message: &Message) -> Result<(), TransportError>
where
    S: futures_util::Sink<tungstenite::Message, Error = tungstenite::Error> + Unpin,
{
    let json = encode_message(message)?;
    tracing::debug!("sending frame: {json}");
    write
        .send(tungstenite::Message::Text(json.into()))
        .await
        .map_err(TransportError::Send)
}
