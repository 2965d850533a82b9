use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, mpsc};

use crate::client::{Client, ClientRegistry, handle_client, write_outbound};
use crate::error::ChatServerError;
use crate::server::config::ServerConfig;

/// The chat relay server: the listening socket plus the shared client
/// registry handed to every connection task.
pub struct Server {
    registry: Arc<Mutex<ClientRegistry>>,
    listener: TcpListener,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// A bind failure is fatal to the process; callers surface the error
    /// and exit.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ChatServerError> {
        let socket = config.socket_addr();
        let listener = TcpListener::bind(&socket).await?;
        info!("Server is listening on {}", listener.local_addr()?);

        Ok(Self {
            registry: Arc::new(Mutex::new(ClientRegistry::new())),
            listener,
        })
    }

    /// The address the listener is actually bound to.
    ///
    /// Tests bind port 0 and read the ephemeral port back from here.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process exits.
    ///
    /// Each accepted connection is registered before its session tasks
    /// are spawned, so a client is visible to broadcasts from its first
    /// message on. Accept errors are logged and do not stop the loop.
    pub async fn run(&self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let (read_half, write_half) = stream.into_split();
                    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

                    {
                        let mut registry = self.registry.lock().await;
                        registry.register(Client::new(addr, outbound_tx));
                        info!(
                            "A new client has connected: {} ({} online)",
                            addr,
                            registry.len()
                        );
                    }

                    tokio::spawn(write_outbound(write_half, outbound_rx, addr));
                    tokio::spawn(handle_client(read_half, Arc::clone(&self.registry), addr));
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
