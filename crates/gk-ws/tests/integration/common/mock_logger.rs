//! Mock logger WebSocket server for integration tests.
//!
//! Provides a server that can:
//! - Accept connections and count them
//! - Answer the auth handshake (or stay silent)
//! - Push log lines after the handshake
//! - Drop the connection to force a reconnect
//! - Record every text frame it receives

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// How the mock behaves on each connection.
#[derive(Debug, Clone)]
pub struct MockLoggerConfig {
    /// Reply `auth_ok` to an auth frame.
    pub reply_auth_ok: bool,
    /// Send `auth_ok` twice.
    pub duplicate_auth_ok: bool,
    /// Frames pushed right after `auth_ok`.
    pub lines: Vec<String>,
    /// Close the socket after pushing `lines`.
    pub close_after_lines: bool,
}

impl Default for MockLoggerConfig {
    fn default() -> Self {
        Self {
            reply_auth_ok: true,
            duplicate_auth_ok: false,
            lines: Vec::new(),
            close_after_lines: false,
        }
    }
}

pub struct MockLoggerServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    messages: Arc<Mutex<Vec<String>>>,
    connections: Arc<Mutex<u32>>,
}

impl MockLoggerServer {
    /// Start a new mock server on an available port.
    pub async fn start(config: MockLoggerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let connections: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let messages_clone = messages.clone();
        let connections_clone = connections.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let messages = messages_clone.clone();
                        let connections = connections_clone.clone();
                        let config = config.clone();
                        tokio::spawn(handle_connection(stream, config, messages, connections));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            messages,
            connections,
        }
    }

    /// Full logger endpoint URL.
    pub fn url(&self) -> String {
        format!("ws://{}/ws/gatekeeper/logger", self.addr)
    }

    /// `host:port` of the server.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub async fn connection_count(&self) -> u32 {
        *self.connections.lock().await
    }

    pub async fn received_messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    config: MockLoggerConfig,
    messages: Arc<Mutex<Vec<String>>>,
    connections: Arc<Mutex<u32>>,
) {
    {
        let mut count = connections.lock().await;
        *count += 1;
    }

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                messages.lock().await.push(text.clone());

                let parsed: serde_json::Value = match serde_json::from_str(&text) {
                    Ok(v) => v,
                    Err(_) => continue,
                };

                match parsed.get("type").and_then(|t| t.as_str()) {
                    Some("auth") if config.reply_auth_ok => {
                        let ok = r#"{"type":"auth_ok"}"#.to_string();
                        let _ = write.send(Message::Text(ok.clone())).await;
                        if config.duplicate_auth_ok {
                            let _ = write.send(Message::Text(ok)).await;
                        }
                        for line in &config.lines {
                            let _ = write.send(Message::Text(line.clone())).await;
                        }
                        if config.close_after_lines {
                            let _ = write.send(Message::Close(None)).await;
                            return;
                        }
                    }
                    Some("ping") => {
                        let pong = r#"{"type":"pong"}"#.to_string();
                        let _ = write.send(Message::Text(pong)).await;
                    }
                    _ => {}
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }
}
