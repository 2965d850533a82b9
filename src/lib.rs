pub mod client;
pub mod error;
pub mod protocol;
pub mod server;

pub use server::{Server, ServerConfig};
