//! Input line parsing.

use thiserror::Error;

/// Commands the presentation layer sends to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Submit the text as a chat message
    Submit(String),
    /// Switch the active room
    SelectRoom(String),
    /// Show the room list
    ListRooms,
    /// End the session
    End,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '/{0}' (try /join <room>, /rooms, /quit)")]
    UnknownCommand(String),

    #[error("usage: /join <room>")]
    MissingRoom,
}

/// Parse one line of user input.
///
/// Lines starting with `/` are commands; `//` escapes a literal slash.
/// Anything else, blank lines included, is submitted as typed and left to the
/// store to accept or ignore.
pub fn parse_input(line: &str) -> Result<SessionCommand, CommandError> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") {
        return Ok(SessionCommand::Submit(trimmed[1..].to_string()));
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(SessionCommand::Submit(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim_end(), ""),
    };

    match name {
        "join" | "room" if arg.is_empty() => Err(CommandError::MissingRoom),
        "join" | "room" => Ok(SessionCommand::SelectRoom(arg.to_string())),
        "rooms" => Ok(SessionCommand::ListRooms),
        "quit" | "exit" => Ok(SessionCommand::End),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_submitted_as_typed() {
        // テスト項目: 通常のテキストはそのまま送信コマンドになる
        // when (操作):
        let result = parse_input("  hello there ");

        // then (期待する結果):
        assert_eq!(
            result,
            Ok(SessionCommand::Submit("  hello there ".to_string()))
        );
    }

    #[test]
    fn test_blank_line_is_submitted() {
        // テスト項目: 空行も送信コマンドとして渡される（無視はストア側で行う）
        // when (操作):
        let result = parse_input("   ");

        // then (期待する結果):
        assert_eq!(result, Ok(SessionCommand::Submit("   ".to_string())));
    }

    #[test]
    fn test_join_command() {
        // テスト項目: /join と /room でルーム切り替えコマンドになる
        // when (操作):
        let join = parse_input("/join Coding");
        let room = parse_input("/room   Random  ");

        // then (期待する結果):
        assert_eq!(join, Ok(SessionCommand::SelectRoom("Coding".to_string())));
        assert_eq!(room, Ok(SessionCommand::SelectRoom("Random".to_string())));
    }

    #[test]
    fn test_join_without_room_fails() {
        // テスト項目: ルーム名なしの /join はエラー
        // when (操作):
        let result = parse_input("/join ");

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::MissingRoom));
    }

    #[test]
    fn test_rooms_and_quit_commands() {
        // テスト項目: /rooms, /quit, /exit を解釈できる
        // then (期待する結果):
        assert_eq!(parse_input("/rooms"), Ok(SessionCommand::ListRooms));
        assert_eq!(parse_input("/quit"), Ok(SessionCommand::End));
        assert_eq!(parse_input("/exit"), Ok(SessionCommand::End));
    }

    #[test]
    fn test_unknown_command_fails() {
        // テスト項目: 未知のコマンドはエラー
        // when (操作):
        let result = parse_input("/shrug");

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::UnknownCommand("shrug".to_string())));
    }

    #[test]
    fn test_double_slash_escapes_text() {
        // テスト項目: // で始まる行はスラッシュ付きのテキストとして送信される
        // when (操作):
        let result = parse_input("//shrug");

        // then (期待する結果):
        assert_eq!(result, Ok(SessionCommand::Submit("/shrug".to_string())));
    }
}
