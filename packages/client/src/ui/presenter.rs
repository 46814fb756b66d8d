//! Rendering of the conversation read model.

use std::io::{self, Write};

use crate::{infrastructure::transport::ConnectionState, usecase::ConversationStore};

/// Column own messages are right-aligned to.
const OWN_MESSAGE_WIDTH: usize = 72;

/// What changed since the previous render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    SessionStarted,
    /// The log grew by one message.
    MessageAppended,
    RoomSwitched,
    RoomsListed,
    RoomRejected(String),
    ConnectionChanged(ConnectionState),
    SessionEnded,
}

impl ViewUpdate {
    /// Cue for the renderer to bring the newest message into view.
    pub fn scrolls_to_latest(&self) -> bool {
        matches!(self, ViewUpdate::MessageAppended)
    }
}

/// Renders the store after every change. Presenters only read the store.
pub trait Presenter {
    fn render(&mut self, store: &ConversationStore, update: &ViewUpdate) -> io::Result<()>;
}

/// Line oriented presenter for a terminal.
///
/// Messages print once, in log order; own messages are right-aligned.
pub struct TerminalPresenter<W: Write> {
    out: W,
    rendered: usize,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, rendered: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_rooms(&mut self, store: &ConversationStore) -> io::Result<()> {
        writeln!(self.out, "ChatRooms")?;
        for room in store.rooms() {
            let marker = if room == store.active_room() { '*' } else { ' ' };
            writeln!(self.out, " {marker} # {room}")?;
        }
        Ok(())
    }

    fn write_header(&mut self, store: &ConversationStore) -> io::Result<()> {
        writeln!(self.out, "=== {} ===", store.active_room())
    }

    fn write_new_messages(&mut self, store: &ConversationStore) -> io::Result<()> {
        let messages = store.current_view().messages;
        for message in messages.iter().skip(self.rendered) {
            if store.is_own(message) {
                let line = format!("{} [{}]", message.text(), message.time());
                writeln!(self.out, "{line:>OWN_MESSAGE_WIDTH$}")?;
            } else {
                writeln!(
                    self.out,
                    "[{}] {}: {}",
                    message.time(),
                    message.sender(),
                    message.text()
                )?;
            }
        }
        self.rendered = messages.len();
        Ok(())
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, store: &ConversationStore, update: &ViewUpdate) -> io::Result<()> {
        match update {
            ViewUpdate::SessionStarted => {
                self.write_rooms(store)?;
                self.write_header(store)?;
                self.write_new_messages(store)?;
            }
            ViewUpdate::MessageAppended => self.write_new_messages(store)?,
            ViewUpdate::RoomSwitched => self.write_header(store)?,
            ViewUpdate::RoomsListed => self.write_rooms(store)?,
            ViewUpdate::RoomRejected(name) => {
                writeln!(self.out, "! unknown room '{name}' (see /rooms)")?;
            }
            ViewUpdate::ConnectionChanged(state) => match state {
                ConnectionState::Connected => writeln!(self.out, "-- connected --")?,
                ConnectionState::Disconnected => writeln!(self.out, "-- disconnected, retrying --")?,
                ConnectionState::Connecting | ConnectionState::Closed => {}
            },
            ViewUpdate::SessionEnded => writeln!(self.out, "-- bye --")?,
        }
        self.out.flush()
    }
}
