//! Transport configuration.

use std::time::Duration;

/// Default endpoint of the relay.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:4000/ws";

/// Default pause between a dropped connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Default number of outbound messages kept while disconnected.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// Default limit for one WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time the connection task gets to close cleanly on teardown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for a [`TransportBridge`](super::TransportBridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// WebSocket URL of the relay (`ws://` or `wss://`).
    pub endpoint: String,
    /// Pause before reconnecting after a failed attempt or a dropped connection.
    pub reconnect_delay: Duration,
    /// Outbound messages kept while disconnected. When full, the oldest one
    /// is dropped. Values below 1 are clamped to 1.
    pub outbound_buffer: usize,
    /// Limit for one handshake. An attempt that takes longer counts as failed
    /// and is retried after `reconnect_delay`.
    pub connect_timeout: Duration,
    /// Time the connection task gets to send a close frame on teardown
    /// before it is aborted.
    pub shutdown_timeout: Duration,
}

impl TransportConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    #[must_use]
    pub fn with_outbound_buffer(mut self, capacity: usize) -> Self {
        self.outbound_buffer = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
