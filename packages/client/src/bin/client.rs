//! Terminal chat client.
//!
//! Connects to a chat relay over WebSocket, shows the room list and the
//! message stream, and sends what you type.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatroom-client -- --endpoint ws://localhost:4000/ws
//! ```

use chatroom_client::{
    ChatSession, ClientArgs, ClientConfig, SessionCommand,
    ui::{TerminalPresenter, parse_input},
};
use chatroom_shared::logger::setup_logger;
use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

const COMMAND_CHANNEL_CAPACITY: usize = 64;

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ClientConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    spawn_input_reader(tx);

    let mut session = ChatSession::new(&config);
    let mut presenter = TerminalPresenter::new(std::io::stdout());
    if let Err(e) = session.run(rx, &mut presenter).await {
        tracing::error!("Session error: {}", e);
        std::process::exit(1);
    }
}

/// Read lines on a blocking thread and forward them as session commands.
fn spawn_input_reader(tx: mpsc::Sender<SessionCommand>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to open line editor: {}", e);
                let _ = tx.blocking_send(SessionCommand::End);
                return;
            }
        };

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let command = match parse_input(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{e}");
                            continue;
                        }
                    };
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    let end = command == SessionCommand::End;
                    if tx.blocking_send(command).is_err() || end {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    let _ = tx.blocking_send(SessionCommand::End);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Input error: {}", e);
                    let _ = tx.blocking_send(SessionCommand::End);
                    break;
                }
            }
        }
    });
}
