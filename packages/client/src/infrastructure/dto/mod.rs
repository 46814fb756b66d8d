//! Data transfer objects exchanged with the transport endpoint.

pub mod websocket;

pub use websocket::{MessagePayload, WireError, WireEvent, decode_frame, encode_message};
