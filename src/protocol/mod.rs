//! Chat protocol implementation
//!
//! Message framing, command parsing, and command handlers.

pub mod commands;
pub mod handlers;
pub mod messages;
pub mod parser;

pub use commands::{COMMAND_PREFIX, Command, CommandStatus};
pub use handlers::handle_command;
pub use messages::Message;
pub use parser::parse_command;
