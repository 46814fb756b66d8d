//! UseCase layer error definitions.

use thiserror::Error;

/// Errors returned by [`ConversationStore`](super::ConversationStore) commands
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested room is not part of the configured room set
    #[error("unknown room '{0}'")]
    UnknownRoom(String),
}
