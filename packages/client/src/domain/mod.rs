//! Domain layer for the chat client.
//!
//! Holds the message/room model and the transport seam the use case layer
//! depends on. Nothing here knows about WebSocket frames or the terminal.

pub mod entity;
pub mod error;
pub mod transport;
pub mod value_object;

pub use entity::{ConversationLog, Message, RoomCatalog};
pub use error::{DomainError, ValueObjectError};
pub use transport::MessageTransport;
#[cfg(test)]
pub use transport::MockMessageTransport;
pub use value_object::{ClockLabel, MessageText, RoomName, Sender};

/// Sender label used for messages authored on this client.
pub const DEFAULT_LOCAL_SENDER: &str = "Me";

/// Rooms offered when no room set is configured.
pub const DEFAULT_ROOMS: [&str; 3] = ["General", "Coding", "Random"];
