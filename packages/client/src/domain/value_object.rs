//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a room name, in bytes.
pub const ROOM_NAME_MAX_LEN: usize = 100;

/// Message text value object.
///
/// Never blank after trimming. The text is kept exactly as typed; trimming
/// only decides whether the text is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::MessageTextBlank` if `text.trim()` is empty.
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        if text.trim().is_empty() {
            return Err(ValueObjectError::MessageTextBlank);
        }
        Ok(Self(text))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sender label value object.
///
/// Either the local identity or whatever label the transport delivered.
/// Remote labels are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sender(String);

impl Sender {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable clock label (`HH:MM` for local messages).
///
/// Formatted once when the message is created and carried as text from then
/// on; it is not parsed back into a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockLabel(String);

impl ClockLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Label for the current local wall-clock time.
    pub fn now() -> Self {
        Self(chatroom_shared::time::current_clock_label())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ClockLabel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// Names a room of the configured room set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// Surrounding whitespace is stripped.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or longer than
    /// [`ROOM_NAME_MAX_LEN`] bytes.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValueObjectError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = name.len();
        if len > ROOM_NAME_MAX_LEN {
            return Err(ValueObjectError::RoomNameTooLong {
                max: ROOM_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
