//! Chat session loop.
//!
//! One task owns the [`ConversationStore`] and reacts to one event at a time:
//! a command from the input side, an inbound message from the transport, or a
//! connection state change. No two store mutations ever overlap.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::{
    infrastructure::transport::{ConnectionState, Subscription, TransportBridge},
    usecase::{ConversationStore, StoreError},
};

use super::{
    command::SessionCommand,
    config::ClientConfig,
    presenter::{Presenter, ViewUpdate},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `run` was called on a session that already ended
    #[error("session already ended")]
    AlreadyEnded,

    /// The inbound registration was replaced or released from elsewhere
    #[error("inbound message subscription was lost")]
    SubscriptionLost,
}

pub struct ChatSession {
    bridge: Arc<TransportBridge>,
    store: ConversationStore,
}

impl ChatSession {
    /// Build the bridge and the store for one session. Nothing connects
    /// until [`run`](Self::run).
    pub fn new(config: &ClientConfig) -> Self {
        let bridge = Arc::new(TransportBridge::new(config.transport.clone()));
        let mut store = ConversationStore::new(
            bridge.clone(),
            config.local_sender.clone(),
            config.catalog.clone(),
        );
        if let Err(err) = store.select_room(config.initial_room.as_str()) {
            tracing::warn!("initial room ignored: {err}");
        }
        Self { bridge, store }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn bridge(&self) -> &Arc<TransportBridge> {
        &self.bridge
    }

    /// Run the session until `End` is received or the command channel closes.
    ///
    /// Subscribes and then connects on start. On exit, normal or not, the
    /// inbound subscription is released and the transport torn down.
    pub async fn run<P: Presenter>(
        &mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        presenter: &mut P,
    ) -> Result<(), SessionError> {
        if self.bridge.state() == ConnectionState::Closed {
            return Err(SessionError::AlreadyEnded);
        }

        // frames decoded while no handler is registered are dropped
        let mut inbound = self.bridge.on_message();
        let mut state_rx = self.bridge.watch_state();
        self.bridge.connect();
        tracing::info!(room = %self.store.active_room(), "session started");
        self.render(presenter, &ViewUpdate::SessionStarted);

        let result = self
            .event_loop(&mut commands, &mut inbound, &mut state_rx, presenter)
            .await;

        drop(inbound);
        self.bridge.teardown().await;
        self.render(presenter, &ViewUpdate::SessionEnded);
        tracing::info!(messages = self.store.current_view().messages.len(), "session ended");

        result
    }

    async fn event_loop<P: Presenter>(
        &mut self,
        commands: &mut mpsc::Receiver<SessionCommand>,
        inbound: &mut Subscription,
        state_rx: &mut watch::Receiver<ConnectionState>,
        presenter: &mut P,
    ) -> Result<(), SessionError> {
        let mut watching_state = true;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::End) | None => return Ok(()),
                    Some(command) => self.handle_command(command, presenter),
                },
                message = inbound.recv() => match message {
                    Some(message) => {
                        self.store.append_remote(message);
                        self.render(presenter, &ViewUpdate::MessageAppended);
                    }
                    None => return Err(SessionError::SubscriptionLost),
                },
                changed = state_rx.changed(), if watching_state => match changed {
                    Ok(()) => {
                        let state = *state_rx.borrow_and_update();
                        tracing::debug!(%state, "connection state changed");
                        self.render(presenter, &ViewUpdate::ConnectionChanged(state));
                    }
                    Err(_) => watching_state = false,
                },
            }
        }
    }

    fn handle_command<P: Presenter>(&mut self, command: SessionCommand, presenter: &mut P) {
        match command {
            SessionCommand::Submit(text) => {
                if self.store.append_local(&text).is_some() {
                    self.render(presenter, &ViewUpdate::MessageAppended);
                }
            }
            SessionCommand::SelectRoom(name) => match self.store.select_room(&name) {
                Ok(_) => self.render(presenter, &ViewUpdate::RoomSwitched),
                Err(StoreError::UnknownRoom(name)) => {
                    tracing::debug!(%name, "room switch rejected");
                    self.render(presenter, &ViewUpdate::RoomRejected(name));
                }
            },
            SessionCommand::ListRooms => self.render(presenter, &ViewUpdate::RoomsListed),
            SessionCommand::End => {}
        }
    }

    fn render<P: Presenter>(&self, presenter: &mut P, update: &ViewUpdate) {
        if let Err(err) = presenter.render(&self.store, update) {
            tracing::warn!("failed to render {update:?}: {err}");
        }
    }
}
