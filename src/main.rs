//! Lobby Chat Server - Entry Point
//!
//! A TCP chat relay: clients join named lobbies and exchange messages
//! relayed to the other members of the same lobby.

use log::{error, info};

use lobby_chat_server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG)
    env_logger::init();

    info!("Server is starting...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(&config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed on {}: {}", config.socket_addr(), e);
            std::process::exit(1);
        }
    };

    server.run().await;
}
