//! Presentation adapter: CLI configuration, input commands, rendering and the
//! session loop tying them to the store and the transport.

pub mod command;
pub mod config;
pub mod presenter;
pub mod session;

pub use command::{CommandError, SessionCommand, parse_input};
pub use config::{ClientArgs, ClientConfig, ConfigError};
pub use presenter::{Presenter, TerminalPresenter, ViewUpdate};
pub use session::{ChatSession, SessionError};
