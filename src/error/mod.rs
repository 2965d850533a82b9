//! Error handling
//!
//! Error types for the chat server.

pub mod types;

pub use types::{ChatServerError, RegistryError};
