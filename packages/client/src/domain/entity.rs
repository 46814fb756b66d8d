//! Core domain models for the chat client.

use super::{
    error::DomainError,
    value_object::{ClockLabel, MessageText, RoomName, Sender},
};

/// Represents a chat message in the domain model
///
/// Immutable once created: there are getters and no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: MessageText,
    sender: Sender,
    time: ClockLabel,
}

impl Message {
    /// Create a new chat message
    pub fn new(text: MessageText, sender: Sender, time: ClockLabel) -> Self {
        Self { text, sender, time }
    }

    /// Message body as typed by its author
    pub fn text(&self) -> &MessageText {
        &self.text
    }

    /// Sender label
    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// Clock label captured when the message was written
    pub fn time(&self) -> &ClockLabel {
        &self.time
    }
}

/// Ordered, append-only message history of a session.
///
/// Insertion order is display order. Entries are never removed or replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end of the log
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

/// The fixed, closed set of rooms the client can switch between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCatalog {
    rooms: Vec<RoomName>,
}

impl RoomCatalog {
    /// Build a catalog from room names, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyRoomCatalog` when no room is given and
    /// `DomainError::DuplicateRoom` when a name repeats.
    pub fn new(rooms: Vec<RoomName>) -> Result<Self, DomainError> {
        if rooms.is_empty() {
            return Err(DomainError::EmptyRoomCatalog);
        }
        for (i, room) in rooms.iter().enumerate() {
            if rooms[..i].contains(room) {
                return Err(DomainError::DuplicateRoom(room.as_str().to_string()));
            }
        }
        Ok(Self { rooms })
    }

    /// Parse a catalog from raw names.
    pub fn from_names<I, S>(names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rooms = names
            .into_iter()
            .map(RoomName::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rooms)
    }

    /// First room of the set, active when a session starts.
    pub fn default_room(&self) -> &RoomName {
        // non-empty by construction
        &self.rooms[0]
    }

    /// Look a room up by name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownRoom` when the name is not in the set.
    pub fn resolve(&self, name: &str) -> Result<&RoomName, DomainError> {
        let name = name.trim();
        self.rooms
            .iter()
            .find(|room| room.as_str() == name)
            .ok_or_else(|| DomainError::UnknownRoom(name.to_string()))
    }

    pub fn contains(&self, room: &RoomName) -> bool {
        self.rooms.contains(room)
    }

    pub fn rooms(&self) -> &[RoomName] {
        &self.rooms
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        let rooms = super::DEFAULT_ROOMS
            .iter()
            .filter_map(|name| RoomName::new(name).ok())
            .collect();
        Self { rooms }
    }
}
