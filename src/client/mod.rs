//! Client connection management
//!
//! Per-connection state, the shared registry, and the session tasks.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::{handle_client, write_outbound};
pub use registry::ClientRegistry;
pub use state::Client;
