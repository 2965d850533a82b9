//! Command handlers for the chat server.
//!
//! Each handler operates on the shared `ClientRegistry` on behalf of the
//! client that sent the command. The caller holds the registry lock for
//! the duration of the call, so every read-mutate-announce sequence is
//! atomic with respect to other joins and leaves and the member counts
//! it reports are never stale.

use log::{info, warn};
use std::net::SocketAddr;

use crate::client::ClientRegistry;
use crate::error::RegistryError;
use crate::protocol::{Command, CommandStatus};

/// Fixed help text enumerating the supported commands.
const HELP_TEXT: &str = "/help - to see this message\n\
    /exit - disconnect from the server\n\
    /create - create a new lobby\n\
    /join - join an existing lobby\n\
    /disconnect - leave current lobby\n\
    /list - get the list of existing lobbies";

/// Dispatches a parsed command to its handler.
///
/// # Arguments
///
/// * `registry` - The guarded client registry; the caller holds the lock.
/// * `addr` - Address of the client the command came from.
/// * `command` - The parsed command.
///
/// # Returns
///
/// * `CommandStatus` - Whether the connection's reader loop continues.
pub fn handle_command(
    registry: &mut ClientRegistry,
    addr: SocketAddr,
    command: &Command,
) -> CommandStatus {
    match command {
        Command::Help => handle_cmd_help(registry, addr),
        Command::Exit => handle_cmd_exit(registry, addr),
        Command::Create(name) => handle_cmd_create(registry, addr, name),
        Command::Join(name) => handle_cmd_join(registry, addr, name),
        Command::Disconnect => handle_cmd_disconnect(registry, addr),
        Command::List => handle_cmd_list(registry, addr),
        Command::Unknown(cmd) => handle_cmd_unknown(addr, cmd),
    }
}

/// Handles `/exit`: says goodbye and removes the client from the registry.
///
/// Removal here races the reader loop's own exit path; `unregister` is
/// idempotent so whichever runs second is a no-op.
fn handle_cmd_exit(registry: &mut ClientRegistry, addr: SocketAddr) -> CommandStatus {
    registry.notify(&addr, "You have left the server. Reconnect to rejoin.");
    registry.unregister(&addr);
    info!("Client {} has left the server", addr);
    CommandStatus::CloseConnection
}

/// Handles `/create`: adds a new lobby and moves the creator into it.
fn handle_cmd_create(
    registry: &mut ClientRegistry,
    addr: SocketAddr,
    name: &str,
) -> CommandStatus {
    if name.is_empty() {
        registry.notify(&addr, "Please specify a lobby name.");
        return CommandStatus::Success;
    }
    if registry.create_lobby(name).is_err() {
        registry.notify(
            &addr,
            "Lobby with this name already exists. Try another name or join it.",
        );
        return CommandStatus::Success;
    }
    // Creating is an implicit join of the new, empty lobby.
    match registry.join_lobby(&addr, name) {
        Ok(_) => {
            info!("Client {} has created new lobby: {}", addr, name);
            registry.notify(
                &addr,
                &format!("You have created and joined the lobby '{}'.", name),
            );
        }
        Err(e) => warn!("Join after create failed for {}: {}", addr, e),
    }
    CommandStatus::Success
}

/// Handles `/join`: moves the client into an existing lobby.
///
/// The joiner is told how many members were already present; those
/// members are told the new total, which is that count plus one. Both
/// numbers come from the same snapshot under the registry lock.
fn handle_cmd_join(registry: &mut ClientRegistry, addr: SocketAddr, name: &str) -> CommandStatus {
    if name.is_empty() {
        registry.notify(&addr, "Please specify a lobby name.");
        return CommandStatus::Success;
    }
    match registry.join_lobby(&addr, name) {
        Ok(count) => {
            info!("Client {} has joined the lobby: {}", addr, name);
            registry.notify(
                &addr,
                &format!("You have joined the lobby '{}' with {} users.", name, count),
            );
            registry.notify(&addr, "Ready to chat.");
            registry.announce(
                name,
                &addr,
                &format!("Someone has joined the lobby! (Now {} users in here)", count + 1),
            );
        }
        Err(RegistryError::LobbyNotFound(_)) => {
            registry.notify(&addr, "Lobby is not found. Try another or create new.");
        }
        Err(e) => warn!("Join failed for {}: {}", addr, e),
    }
    CommandStatus::Success
}

/// Handles `/disconnect`: removes the client from its current lobby.
///
/// The remaining members are told the member count after the departure.
fn handle_cmd_disconnect(registry: &mut ClientRegistry, addr: SocketAddr) -> CommandStatus {
    let lobby = registry
        .client(&addr)
        .and_then(|c| c.lobby().map(str::to_string));
    let Some(lobby) = lobby else {
        registry.notify(&addr, "You have not joined any lobbies yet.");
        return CommandStatus::Success;
    };
    if let Some(client) = registry.client_mut(&addr) {
        client.set_lobby(None);
    }
    info!("Client {} has left the lobby: {}", addr, lobby);
    registry.notify(&addr, "You have disconnected from the lobby.");
    let remaining = registry.count_members(&lobby);
    registry.announce(
        &lobby,
        &addr,
        &format!("Someone has left the lobby! :( (Now {} users in here)", remaining),
    );
    CommandStatus::Success
}

/// Handles `/list`: reports every known lobby and its live member count.
fn handle_cmd_list(registry: &mut ClientRegistry, addr: SocketAddr) -> CommandStatus {
    let entries: Vec<String> = registry
        .list_lobbies()
        .into_iter()
        .map(|(name, count)| format!("{} ({} users)", name, count))
        .collect();
    registry.notify(
        &addr,
        &format!("Available lobbies:\n{}", entries.join(", ")),
    );
    CommandStatus::Success
}

/// Handles `/help`: sends the fixed command listing.
fn handle_cmd_help(registry: &mut ClientRegistry, addr: SocketAddr) -> CommandStatus {
    registry.notify(&addr, HELP_TEXT);
    CommandStatus::Success
}

/// Handles an unrecognized command: no client-visible response, the
/// diagnostic record is the only observable effect.
fn handle_cmd_unknown(addr: SocketAddr, cmd: &str) -> CommandStatus {
    warn!("Unknown command '{}' received from client: {}", cmd, addr);
    CommandStatus::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::protocol::Message;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn test_addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    fn add_client(
        registry: &mut ClientRegistry,
        port: u16,
    ) -> (SocketAddr, UnboundedReceiver<Message>) {
        let addr = test_addr(port);
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(Client::new(addr, tx));
        (addr, rx)
    }

    fn next_notification(rx: &mut UnboundedReceiver<Message>) -> String {
        let msg = rx.try_recv().expect("expected a queued message");
        assert!(msg.is_notification);
        msg.text
    }

    fn assert_silent(rx: &mut UnboundedReceiver<Message>) {
        assert!(rx.try_recv().is_err(), "expected no queued messages");
    }

    #[test]
    fn create_joins_the_new_lobby() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4001);

        let status = handle_command(&mut registry, addr, &Command::Create("red".into()));

        assert_eq!(status, CommandStatus::Success);
        assert_eq!(
            next_notification(&mut rx),
            "You have created and joined the lobby 'red'."
        );
        assert_eq!(registry.client(&addr).unwrap().lobby(), Some("red"));
        assert_eq!(registry.count_members("red"), 1);
    }

    #[test]
    fn create_without_name_is_rejected() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4002);

        handle_command(&mut registry, addr, &Command::Create(String::new()));

        assert_eq!(next_notification(&mut rx), "Please specify a lobby name.");
        assert!(registry.list_lobbies().is_empty());
    }

    #[test]
    fn duplicate_create_leaves_one_lobby() {
        let mut registry = ClientRegistry::new();
        let (first, mut first_rx) = add_client(&mut registry, 4003);
        let (second, mut second_rx) = add_client(&mut registry, 4004);

        handle_command(&mut registry, first, &Command::Create("red".into()));
        handle_command(&mut registry, second, &Command::Create("red".into()));

        next_notification(&mut first_rx);
        assert_eq!(
            next_notification(&mut second_rx),
            "Lobby with this name already exists. Try another name or join it."
        );
        assert_eq!(registry.list_lobbies().len(), 1);
        assert_eq!(registry.client(&second).unwrap().lobby(), None);
    }

    #[test]
    fn join_reports_pre_join_count_and_announces_new_total() {
        let mut registry = ClientRegistry::new();
        let (creator, mut creator_rx) = add_client(&mut registry, 4005);
        let (joiner, mut joiner_rx) = add_client(&mut registry, 4006);

        handle_command(&mut registry, creator, &Command::Create("red".into()));
        next_notification(&mut creator_rx);

        handle_command(&mut registry, joiner, &Command::Join("red".into()));

        assert_eq!(
            next_notification(&mut joiner_rx),
            "You have joined the lobby 'red' with 1 users."
        );
        assert_eq!(next_notification(&mut joiner_rx), "Ready to chat.");
        assert_eq!(
            next_notification(&mut creator_rx),
            "Someone has joined the lobby! (Now 2 users in here)"
        );
    }

    #[test]
    fn join_missing_lobby_leaves_membership_unset() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4007);

        handle_command(&mut registry, addr, &Command::Join("blue".into()));

        assert_eq!(
            next_notification(&mut rx),
            "Lobby is not found. Try another or create new."
        );
        assert_eq!(registry.client(&addr).unwrap().lobby(), None);
    }

    #[test]
    fn join_without_name_is_rejected() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4008);

        handle_command(&mut registry, addr, &Command::Join(String::new()));

        assert_eq!(next_notification(&mut rx), "Please specify a lobby name.");
    }

    #[test]
    fn disconnect_announces_post_removal_count() {
        let mut registry = ClientRegistry::new();
        let (creator, mut creator_rx) = add_client(&mut registry, 4009);
        let (joiner, mut joiner_rx) = add_client(&mut registry, 4010);

        handle_command(&mut registry, creator, &Command::Create("red".into()));
        handle_command(&mut registry, joiner, &Command::Join("red".into()));
        next_notification(&mut creator_rx); // created
        next_notification(&mut creator_rx); // join announcement
        next_notification(&mut joiner_rx);
        next_notification(&mut joiner_rx);

        handle_command(&mut registry, creator, &Command::Disconnect);

        assert_eq!(
            next_notification(&mut creator_rx),
            "You have disconnected from the lobby."
        );
        assert_eq!(
            next_notification(&mut joiner_rx),
            "Someone has left the lobby! :( (Now 1 users in here)"
        );
        assert_eq!(registry.client(&creator).unwrap().lobby(), None);
        assert_eq!(registry.count_members("red"), 1);
    }

    #[test]
    fn disconnect_without_lobby_is_rejected() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4011);

        handle_command(&mut registry, addr, &Command::Disconnect);

        assert_eq!(
            next_notification(&mut rx),
            "You have not joined any lobbies yet."
        );
    }

    #[test]
    fn list_reports_live_counts() {
        let mut registry = ClientRegistry::new();
        let (first, mut first_rx) = add_client(&mut registry, 4012);
        let (second, mut second_rx) = add_client(&mut registry, 4013);

        handle_command(&mut registry, first, &Command::Create("red".into()));
        handle_command(&mut registry, second, &Command::Create("blue".into()));
        handle_command(&mut registry, second, &Command::Disconnect);
        next_notification(&mut first_rx);
        next_notification(&mut second_rx);
        next_notification(&mut second_rx);

        handle_command(&mut registry, first, &Command::List);

        let listing = next_notification(&mut first_rx);
        assert!(listing.starts_with("Available lobbies:"));
        assert!(listing.contains("red (1 users)"));
        assert!(listing.contains("blue (0 users)"));
    }

    #[test]
    fn help_lists_every_command() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4014);

        handle_command(&mut registry, addr, &Command::Help);

        let help = next_notification(&mut rx);
        for cmd in ["/help", "/exit", "/create", "/join", "/disconnect", "/list"] {
            assert!(help.contains(cmd), "help text is missing {}", cmd);
        }
    }

    #[test]
    fn exit_unregisters_and_closes() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4015);

        let status = handle_command(&mut registry, addr, &Command::Exit);

        assert_eq!(status, CommandStatus::CloseConnection);
        assert_eq!(
            next_notification(&mut rx),
            "You have left the server. Reconnect to rejoin."
        );
        assert!(registry.client(&addr).is_none());

        // The reader loop's exit path may run the same removal again.
        let status = handle_command(&mut registry, addr, &Command::Exit);
        assert_eq!(status, CommandStatus::CloseConnection);
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_command_sends_nothing() {
        let mut registry = ClientRegistry::new();
        let (addr, mut rx) = add_client(&mut registry, 4016);

        let status = handle_command(&mut registry, addr, &Command::Unknown("/quit".into()));

        assert_eq!(status, CommandStatus::Success);
        assert_silent(&mut rx);
    }
}
