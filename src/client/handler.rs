//! Per-connection session tasks.
//!
//! Each accepted connection runs two tasks: a reader that decodes
//! messages off the socket and routes them, and a writer that drains the
//! client's outbound queue into the socket. Any terminal read condition
//! unregisters the client, so dead connections never linger in the
//! registry.

use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::client::ClientRegistry;
use crate::protocol::{COMMAND_PREFIX, CommandStatus, Message, handle_command, parse_command};

/// Reads messages from one client until the connection terminates.
///
/// Every exit path (clean `/exit`, peer close, I/O or decode failure)
/// falls through to the same unregister call; removal is idempotent so
/// racing the explicit `/exit` removal is harmless.
pub async fn handle_client(
    read_half: OwnedReadHalf,
    registry: Arc<Mutex<ClientRegistry>>,
    addr: SocketAddr,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                info!("Connection closed by client {}", addr);
                break;
            }
            Ok(_) => {
                let msg: Message = match serde_json::from_str(line.trim_end()) {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!("Error decoding message from {}: {}", addr, e);
                        break;
                    }
                };
                info!("A message '{}' has been received from: {}", msg.text, addr);

                if msg.text.starts_with(COMMAND_PREFIX) {
                    let command = parse_command(&msg.text);
                    let status = {
                        let mut registry_guard = registry.lock().await;
                        handle_command(&mut registry_guard, addr, &command)
                    };
                    if status == CommandStatus::CloseConnection {
                        break;
                    }
                } else {
                    let registry_guard = registry.lock().await;
                    if registry_guard
                        .client(&addr)
                        .and_then(|client| client.lobby())
                        .is_none()
                    {
                        registry_guard.notify(
                            &addr,
                            "You have not joined any lobbies. Try /list to get the lobby list.",
                        );
                    } else {
                        registry_guard.broadcast(&addr, &msg);
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", addr, e);
                break;
            }
        }
    }

    // Idempotent: the /exit handler may have removed the client already.
    if registry.lock().await.unregister(&addr).is_some() {
        info!("Client {} disconnected", addr);
    }
}

/// Drains a client's outbound queue into the socket's write half.
///
/// Runs until the queue closes (the client was unregistered) or a write
/// fails. Messages already queued are flushed before the task ends, so a
/// farewell notification sent just before removal still reaches the peer.
pub async fn write_outbound(
    mut write_half: OwnedWriteHalf,
    mut outbound: UnboundedReceiver<Message>,
    addr: SocketAddr,
) {
    while let Some(message) = outbound.recv().await {
        let mut encoded = match serde_json::to_string(&message) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("Error encoding message for {}: {}", addr, e);
                continue;
            }
        };
        encoded.push('\n');
        if let Err(e) = write_half.write_all(encoded.as_bytes()).await {
            warn!("Error writing to {}: {}", addr, e);
            break;
        }
    }
}
