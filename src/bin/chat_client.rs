//! Terminal chat client.
//!
//! Connects to the relay server, forwards stdin lines as chat messages,
//! and prints everything the server delivers. Notifications render as
//! bare text, peer chat with a timestamp.

use log::error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;

use lobby_chat_server::protocol::Message;

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() {
    env_logger::init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Error connecting to server at {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    println!("Established connection to the server at {}", addr);
    println!("Print /help for commands available.");

    let (read_half, mut write_half) = stream.into_split();
    tokio::spawn(receive_messages(read_half));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let mut encoded = match serde_json::to_string(&Message::chat(line)) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("Error encoding message: {}", e);
                continue;
            }
        };
        encoded.push('\n');
        if let Err(e) = write_half.write_all(encoded.as_bytes()).await {
            error!("Error sending message: {}", e);
            break;
        }
    }
}

/// Prints messages from the server until the connection closes.
async fn receive_messages(read_half: OwnedReadHalf) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => return,
            Ok(_) => match serde_json::from_str::<Message>(line.trim_end()) {
                Ok(msg) if msg.is_notification => println!("{}", msg.text),
                Ok(msg) => {
                    println!("{} Anonymous: {}", msg.timestamp.format("%H:%M"), msg.text)
                }
                Err(e) => {
                    error!("Error decoding message: {}", e);
                    return;
                }
            },
            Err(e) => {
                error!("Error reading from server: {}", e);
                return;
            }
        }
    }
}
