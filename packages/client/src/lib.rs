//! Real-time chat room client.
//!
//! The conversation store keeps the session's append-only message log and the
//! active room; the transport bridge keeps one WebSocket connection to the
//! chat relay alive and feeds inbound messages back to the session loop.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use infrastructure::{ConnectionState, Subscription, TransportBridge, TransportConfig};
pub use ui::{ChatSession, ClientArgs, ClientConfig, SessionCommand};
pub use usecase::{ConversationStore, ConversationView};
