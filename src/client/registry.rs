//! Client registry
//!
//! The process-wide collection of connected clients and known lobby
//! names. The server wraps one `ClientRegistry` in a `tokio::sync::Mutex`
//! and hands it to every connection task; handlers operate on the guarded
//! value, so each compound read-mutate-announce sequence runs under one
//! lock acquisition.

use log::{debug, warn};
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::client::Client;
use crate::error::RegistryError;
use crate::protocol::Message;

/// Registry of connected clients and known lobbies.
///
/// Lobby names are never removed once created. A client's lobby, when
/// set, is always an element of `lobbies`.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<SocketAddr, Client>,
    lobbies: Vec<String>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            lobbies: Vec::new(),
        }
    }

    /// Adds a client to the registry, keyed by its address.
    pub fn register(&mut self, client: Client) {
        self.clients.insert(client.addr(), client);
    }

    /// Removes a client; a no-op if it is already gone.
    ///
    /// The explicit `/exit` path and the reader loop's exit path can both
    /// reach this for the same client, in either order.
    pub fn unregister(&mut self, addr: &SocketAddr) -> Option<Client> {
        self.clients.remove(addr)
    }

    pub fn client(&self, addr: &SocketAddr) -> Option<&Client> {
        self.clients.get(addr)
    }

    pub fn client_mut(&mut self, addr: &SocketAddr) -> Option<&mut Client> {
        self.clients.get_mut(addr)
    }

    /// Number of connected clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether a lobby with this name has been created.
    pub fn lobby_exists(&self, name: &str) -> bool {
        self.lobbies.iter().any(|lobby| lobby == name)
    }

    /// Creates a new lobby without joining anyone to it.
    pub fn create_lobby(&mut self, name: &str) -> Result<(), RegistryError> {
        if self.lobby_exists(name) {
            return Err(RegistryError::LobbyAlreadyExists(name.to_string()));
        }
        self.lobbies.push(name.to_string());
        Ok(())
    }

    /// Moves a client into an existing lobby.
    ///
    /// Returns the member count as it was before the join, the number the
    /// joiner is told about; existing members are announced that count
    /// plus one.
    pub fn join_lobby(&mut self, addr: &SocketAddr, name: &str) -> Result<usize, RegistryError> {
        if !self.lobby_exists(name) {
            return Err(RegistryError::LobbyNotFound(name.to_string()));
        }
        let count = self.count_members(name);
        let client = self
            .clients
            .get_mut(addr)
            .ok_or(RegistryError::ClientNotFound(*addr))?;
        client.set_lobby(Some(name.to_string()));
        Ok(count)
    }

    /// Number of clients currently in the given lobby.
    pub fn count_members(&self, lobby: &str) -> usize {
        self.clients
            .values()
            .filter(|client| client.lobby() == Some(lobby))
            .count()
    }

    /// Every known lobby with its live member count.
    pub fn list_lobbies(&self) -> Vec<(String, usize)> {
        self.lobbies
            .iter()
            .map(|lobby| (lobby.clone(), self.count_members(lobby)))
            .collect()
    }

    /// Queues a server notification for one client.
    ///
    /// Unknown addresses are ignored; the target may have been removed by
    /// a racing exit.
    pub fn notify(&self, addr: &SocketAddr, text: &str) {
        if let Some(client) = self.clients.get(addr) {
            if let Err(e) = client.send(Message::notification(text)) {
                warn!("Failed to queue notification for {}: {}", addr, e);
            }
        }
    }

    /// Queues a server notification for every member of `lobby` except
    /// the client at `except`.
    pub fn announce(&self, lobby: &str, except: &SocketAddr, text: &str) {
        for client in self.members_of(lobby, except) {
            if let Err(e) = client.send(Message::notification(text)) {
                warn!("Failed to queue notification for {}: {}", client.addr(), e);
            }
        }
    }

    /// Delivers a chat message to every other member of the sender's
    /// lobby.
    ///
    /// Delivery is send-and-forget: a recipient whose queue is closed is
    /// logged and skipped, and the sender is never told. Does nothing if
    /// the sender has no lobby; callers reject lobbyless senders with a
    /// notification before getting here.
    pub fn broadcast(&self, sender: &SocketAddr, message: &Message) {
        let Some(lobby) = self.clients.get(sender).and_then(|c| c.lobby()) else {
            return;
        };
        debug!("Broadcasting to lobby '{}'", lobby);
        for client in self.members_of(lobby, sender) {
            if let Err(e) = client.send(message.clone()) {
                warn!("Failed to queue message for {}: {}", client.addr(), e);
            } else {
                debug!("A message '{}' was sent to: {}", message.text, client.addr());
            }
        }
    }

    /// Members of `lobby` excluding one address.
    fn members_of<'a>(
        &'a self,
        lobby: &'a str,
        except: &'a SocketAddr,
    ) -> impl Iterator<Item = &'a Client> {
        self.clients
            .values()
            .filter(move |client| client.addr() != *except && client.lobby() == Some(lobby))
    }
}
