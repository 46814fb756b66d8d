//! Outbound transport seam.

use super::entity::Message;

/// Outbound side of the real-time transport, as seen by the use case layer.
///
/// Implemented by the WebSocket bridge in the infrastructure layer; the
/// conversation store only holds an `Arc<dyn MessageTransport>`.
#[cfg_attr(test, mockall::automock)]
pub trait MessageTransport: Send + Sync {
    /// Queue a message for delivery. Fire-and-forget: implementations absorb
    /// every failure and never report back to the caller.
    fn send(&self, message: &Message);
}
