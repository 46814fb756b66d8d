//! Transport layer error definitions.
//!
//! None of these reach the conversation store: the connection task logs them
//! and moves on to the next reconnect attempt.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::infrastructure::dto::WireError;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The WebSocket handshake with the endpoint failed
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: tungstenite::Error,
    },

    /// The WebSocket handshake did not finish in time
    #[error("timed out connecting to {endpoint} after {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },

    /// Writing a frame failed
    #[error("failed to send frame: {0}")]
    Send(#[source] tungstenite::Error),

    /// Reading from the socket failed
    #[error("failed to receive frame: {0}")]
    Receive(#[source] tungstenite::Error),

    /// An outbound message could not be encoded
    #[error(transparent)]
    Encode(#[from] WireError),

    /// The endpoint closed the connection
    #[error("connection closed by endpoint")]
    Closed,
}
