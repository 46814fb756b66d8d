//! Command line arguments and the validated client configuration.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::{
    domain::{DEFAULT_LOCAL_SENDER, DEFAULT_ROOMS, DomainError, RoomCatalog, RoomName, Sender},
    infrastructure::transport::{
        DEFAULT_ENDPOINT, DEFAULT_OUTBOUND_BUFFER, DEFAULT_RECONNECT_DELAY, TransportConfig,
    },
};

/// Errors raised while turning [`ClientArgs`] into a [`ClientConfig`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint is not a ws:// or wss:// URL
    #[error("endpoint must start with ws:// or wss:// (got: {0})")]
    InvalidEndpoint(String),

    /// Sender label is blank
    #[error("sender cannot be blank")]
    EmptySender,

    /// Room set is invalid, or the initial room is not part of it
    #[error(transparent)]
    Rooms(#[from] DomainError),
}

/// Terminal chat client for a real-time chat relay.
#[derive(Debug, Clone, Parser)]
#[command(name = "chatroom-client", version, about)]
pub struct ClientArgs {
    /// WebSocket URL of the chat relay
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Sender label attached to your messages
    #[arg(short, long, default_value = DEFAULT_LOCAL_SENDER)]
    pub sender: String,

    /// Comma separated room names
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_ROOMS.map(String::from))]
    pub rooms: Vec<String>,

    /// Room to open at start (defaults to the first room)
    #[arg(long)]
    pub room: Option<String>,

    /// Milliseconds to wait before reconnecting
    #[arg(long, default_value_t = DEFAULT_RECONNECT_DELAY.as_millis() as u64)]
    pub reconnect_delay_ms: u64,

    /// Messages kept for delivery while disconnected
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    pub outbound_buffer: usize,

    /// Default log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated configuration of one chat session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub transport: TransportConfig,
    pub local_sender: Sender,
    pub catalog: RoomCatalog,
    pub initial_room: RoomName,
}

impl ClientConfig {
    /// Configuration with default sender and rooms for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let catalog = RoomCatalog::default();
        Self {
            transport: TransportConfig::new(endpoint),
            local_sender: Sender::new(DEFAULT_LOCAL_SENDER),
            initial_room: catalog.default_room().clone(),
            catalog,
        }
    }
}

impl TryFrom<ClientArgs> for ClientConfig {
    type Error = ConfigError;

    fn try_from(args: ClientArgs) -> Result<Self, Self::Error> {
        let endpoint = args.endpoint.trim();
        if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
            return Err(ConfigError::InvalidEndpoint(args.endpoint));
        }

        if args.sender.trim().is_empty() {
            return Err(ConfigError::EmptySender);
        }

        let catalog = RoomCatalog::from_names(&args.rooms)?;
        let initial_room = match args.room.as_deref() {
            Some(name) => catalog.resolve(name)?.clone(),
            None => catalog.default_room().clone(),
        };

        let transport = TransportConfig::new(endpoint)
            .with_reconnect_delay(Duration::from_millis(args.reconnect_delay_ms))
            .with_outbound_buffer(args.outbound_buffer);

        Ok(Self {
            transport,
            local_sender: Sender::new(args.sender.trim()),
            catalog,
            initial_room,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ClientArgs {
        ClientArgs::try_parse_from(std::iter::once("chatroom-client").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしではデフォルト設定になる
        // when (操作):
        let config = ClientConfig::try_from(parse(&[])).unwrap();

        // then (期待する結果):
        assert_eq!(config.transport.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.transport.reconnect_delay, DEFAULT_RECONNECT_DELAY);
        assert_eq!(config.local_sender.as_str(), "Me");
        assert_eq!(config.catalog, RoomCatalog::default());
        assert_eq!(config.initial_room.as_str(), "General");
    }

    #[test]
    fn test_custom_rooms_and_initial_room() {
        // テスト項目: ルーム一覧と初期ルームを指定できる
        // when (操作):
        let config = ClientConfig::try_from(parse(&[
            "--rooms",
            "Ops,Dev",
            "--room",
            "Dev",
            "--sender",
            "alice",
            "--reconnect-delay-ms",
            "250",
        ]))
        .unwrap();

        // then (期待する結果):
        let rooms: Vec<&str> = config.catalog.rooms().iter().map(|r| r.as_str()).collect();
        assert_eq!(rooms, vec!["Ops", "Dev"]);
        assert_eq!(config.initial_room.as_str(), "Dev");
        assert_eq!(config.local_sender.as_str(), "alice");
        assert_eq!(config.transport.reconnect_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_endpoint_fails() {
        // テスト項目: ws:// / wss:// 以外のエンドポイントはエラー
        // when (操作):
        let result = ClientConfig::try_from(parse(&["--endpoint", "http://localhost:4000"]));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidEndpoint("http://localhost:4000".to_string())
        );
    }

    #[test]
    fn test_blank_sender_fails() {
        // テスト項目: 空白のみの送信者名はエラー
        // when (操作):
        let result = ClientConfig::try_from(parse(&["--sender", "  "]));

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ConfigError::EmptySender);
    }

    #[test]
    fn test_unknown_initial_room_fails() {
        // テスト項目: ルーム一覧にない初期ルームはエラー
        // when (操作):
        let result = ClientConfig::try_from(parse(&["--room", "Music"]));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Rooms(DomainError::UnknownRoom("Music".to_string()))
        );
    }
}
