//! WebSocket transport bridge.
//!
//! One [`TransportBridge`] owns the one connection of a session. A background
//! task keeps it alive (connect, exchange frames, reconnect after a delay) and
//! talks to the rest of the client only through channels.

mod bridge;
mod config;
mod error;
mod state;
mod subscription;

pub use bridge::TransportBridge;
pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_OUTBOUND_BUFFER, DEFAULT_RECONNECT_DELAY,
    TransportConfig,
};
pub use error::TransportError;
pub use state::ConnectionState;
pub use subscription::Subscription;
