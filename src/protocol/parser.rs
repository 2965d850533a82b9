//! Command parsing
//!
//! Turns a raw line beginning with the command prefix into a `Command`.

use crate::protocol::Command;

/// Parses a raw command line into a `Command`.
///
/// The first whitespace-delimited token is the command name and is
/// case-sensitive. For `/create` and `/join` the argument is the
/// remainder of the line, trimmed and lowercased, so lobby names match
/// case-insensitively everywhere.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim().to_lowercase();

    match cmd {
        "/help" => Command::Help,
        "/exit" => Command::Exit,
        "/create" => Command::Create(arg),
        "/join" => Command::Join(arg),
        "/disconnect" => Command::Disconnect,
        "/list" => Command::List,
        _ => Command::Unknown(cmd.to_string()),
    }
}
