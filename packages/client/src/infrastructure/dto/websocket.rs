//! WebSocket message DTOs for the chat client.
//!
//! Every frame is a JSON text frame tagged by `type`. The only event is
//! `message`, used in both directions:
//!
//! ```json
//! {"type":"message","text":"hello","sender":"Me","time":"10:05"}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ClockLabel, Message, MessageText, Sender, ValueObjectError};

/// Errors raised while encoding or decoding frames
#[derive(Debug, Error)]
pub enum WireError {
    /// Not JSON, unknown `type`, or a missing/non-string field
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Structurally valid but rejected by the domain (blank text)
    #[error("invalid message payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),
}

/// Event envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WireEvent {
    Message(MessagePayload),
}

/// Chat message sent and received between clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub text: String,
    pub sender: String,
    pub time: String,
}

impl From<&Message> for MessagePayload {
    fn from(message: &Message) -> Self {
        Self {
            text: message.text().as_str().to_string(),
            sender: message.sender().as_str().to_string(),
            time: message.time().as_str().to_string(),
        }
    }
}

impl TryFrom<MessagePayload> for Message {
    type Error = ValueObjectError;

    fn try_from(payload: MessagePayload) -> Result<Self, Self::Error> {
        Ok(Message::new(
            MessageText::new(payload.text)?,
            Sender::from(payload.sender),
            ClockLabel::from(payload.time),
        ))
    }
}

/// Serialize a message into a text frame.
pub fn encode_message(message: &Message) -> Result<String, WireError> {
    let event = WireEvent::Message(MessagePayload::from(message));
    Ok(serde_json::to_string(&event)?)
}

/// Parse a text frame into a well-formed message.
pub fn decode_frame(text: &str) -> Result<Message, WireError> {
    match serde_json::from_str::<WireEvent>(text)? {
        WireEvent::Message(payload) => Ok(Message::try_from(payload)?),
    }
}
