//! Connection lifecycle states.

use std::fmt;

/// `Disconnected → Connecting → Connected → Disconnected → Connecting …`
/// until teardown moves the bridge to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No connection; either `connect` was not called yet or the connection
    /// dropped and a retry is pending.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    Connected,
    /// Torn down; terminal.
    Closed,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closed => "closed",
        };
        f.write_str(label)
    }
}
