//! Infrastructure layer: wire format and the WebSocket transport.

pub mod dto;
pub mod transport;

pub use transport::{ConnectionState, Subscription, TransportBridge, TransportConfig};
