//! Shared utilities for the chatroom client.

pub mod logger;
pub mod time;
