//! Module `state`
//!
//! Defines the `Client` struct holding per-connection server-side state:
//! the peer address, the outbound message queue, and current lobby
//! membership.

use std::net::SocketAddr;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::error::SendError;

use crate::protocol::Message;

/// Server-side state of one connected client.
///
/// The outbound queue decouples delivery from socket I/O: the writer
/// task owns the socket's write half and drains this queue, so code
/// holding the registry lock never blocks on a slow peer.
#[derive(Debug)]
pub struct Client {
    addr: SocketAddr,
    outbound: UnboundedSender<Message>,
    lobby: Option<String>,
}

impl Client {
    /// Creates a client with no lobby membership.
    pub fn new(addr: SocketAddr, outbound: UnboundedSender<Message>) -> Self {
        Self {
            addr,
            outbound,
            lobby: None,
        }
    }

    /// Returns the client's socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the lobby this client is currently in, if any.
    pub fn lobby(&self) -> Option<&str> {
        self.lobby.as_deref()
    }

    /// Sets or clears the client's lobby membership.
    pub fn set_lobby(&mut self, lobby: Option<String>) {
        self.lobby = lobby;
    }

    /// Queues a message for delivery to this client.
    ///
    /// Fails only when the writer task is gone, i.e. the connection is
    /// already torn down.
    pub fn send(&self, message: Message) -> Result<(), SendError<Message>> {
        self.outbound.send(message)
    }
}
