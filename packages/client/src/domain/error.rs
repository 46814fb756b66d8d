//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Message text is empty or whitespace only
    #[error("MessageText cannot be blank")]
    MessageTextBlank,

    /// RoomName validation error
    #[error("RoomName cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("RoomName cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },
}

/// Errors related to room selection and the room catalog
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The configured room set has no rooms
    #[error("room catalog must contain at least one room")]
    EmptyRoomCatalog,

    /// The same room name appears twice in the room set
    #[error("room '{0}' is listed more than once")]
    DuplicateRoom(String),

    /// A room outside the configured set was requested
    #[error("unknown room '{0}'")]
    UnknownRoom(String),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),
}
