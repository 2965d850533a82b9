//! Module `commands`
//!
//! Defines the chat command set and the status values returned by the
//! command handlers.

/// Prefix distinguishing commands from chat text.
pub const COMMAND_PREFIX: char = '/';

/// A command parsed from a client line.
///
/// Commands carrying a lobby name store it already trimmed and
/// lowercased. `Unknown` keeps the unrecognized token for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Exit,
    Create(String),
    Join(String),
    Disconnect,
    List,
    Unknown(String),
}

/// Outcome of executing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The session continues.
    Success,
    /// The client asked to leave; the reader loop must stop.
    CloseConnection,
}
