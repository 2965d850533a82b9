//! Error types
//!
//! Defines domain-specific error types for the chat server modules.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Registry operation errors
///
/// These are expected user-input outcomes; handlers convert them into
/// client notifications rather than propagating them.
#[derive(Debug)]
pub enum RegistryError {
    LobbyAlreadyExists(String),
    LobbyNotFound(String),
    ClientNotFound(SocketAddr),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::LobbyAlreadyExists(name) => {
                write!(f, "Lobby already exists: {}", name)
            }
            RegistryError::LobbyNotFound(name) => write!(f, "Lobby not found: {}", name),
            RegistryError::ClientNotFound(addr) => write!(f, "Client not found: {}", addr),
        }
    }
}

impl std::error::Error for RegistryError {}

/// General chat server error that encompasses all error types
#[derive(Debug)]
pub enum ChatServerError {
    Registry(RegistryError),
    Io(io::Error),
    Config(config::ConfigError),
}

impl fmt::Display for ChatServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatServerError::Registry(e) => write!(f, "Registry error: {}", e),
            ChatServerError::Io(e) => write!(f, "I/O error: {}", e),
            ChatServerError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ChatServerError {}

impl From<RegistryError> for ChatServerError {
    fn from(error: RegistryError) -> Self {
        ChatServerError::Registry(error)
    }
}

impl From<io::Error> for ChatServerError {
    fn from(error: io::Error) -> Self {
        ChatServerError::Io(error)
    }
}

impl From<config::ConfigError> for ChatServerError {
    fn from(error: config::ConfigError) -> Self {
        ChatServerError::Config(error)
    }
}
