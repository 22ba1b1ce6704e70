//! Log stream connection manager.
//!
//! Owns the single logger socket, performs the token handshake, keeps the
//! connection alive and reconnects after a fixed delay when it drops.

use crate::error::{WsError, WsResult};
use crate::keepalive::KeepAlive;
use crate::message::{decode_frame, ClientFrame, ServerFrame};
use crate::retry::RetryPolicy;
use crate::state::{LogEvent, StreamState, StreamStatus};
use futures_util::{SinkExt, StreamExt};
use gk_session::{AuthToken, SessionHandle};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Path of the log broadcast endpoint on the Gatekeeper server.
pub const LOGGER_PATH: &str = "/ws/gatekeeper/logger";

pub const CLOSED_MESSAGE: &str = "Connection closed, reconnecting...";
pub const ERROR_MESSAGE: &str = "Connection error, reconnecting...";

/// Log stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogStreamConfig {
    /// WebSocket scheme ("ws" or "wss").
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Full endpoint URL. Overrides scheme + session server address when set.
    #[serde(default)]
    pub url: Option<String>,
    /// Keep-alive ping interval while connected.
    #[serde(default = "default_keepalive_interval_ms")]
    pub keepalive_interval_ms: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_scheme() -> String {
    "ws".to_string()
}

fn default_keepalive_interval_ms() -> u64 {
    30_000
}

impl Default for LogStreamConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            url: None,
            keepalive_interval_ms: default_keepalive_interval_ms(),
            retry: RetryPolicy::default(),
        }
    }
}

impl LogStreamConfig {
    /// Endpoint URL for a server address.
    pub fn endpoint(&self, server_address: &str) -> WsResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        if server_address.is_empty() {
            return Err(WsError::ConnectionFailed(
                "No server address configured".to_string(),
            ));
        }
        Ok(format!("{}://{}{}", self.scheme, server_address, LOGGER_PATH))
    }
}

/// Log stream client.
///
/// `connect()` runs until `shutdown()` is called, the session has no token,
/// or the retry policy is exhausted. Status changes and log lines are sent
/// on the event channel; nothing is sent after shutdown.
pub struct LogStreamClient {
    config: LogStreamConfig,
    session: SessionHandle,
    state: RwLock<StreamState>,
    last_error: RwLock<Option<String>>,
    keepalive: KeepAlive,
    event_tx: mpsc::Sender<LogEvent>,
    reconnect_count: RwLock<u32>,
    shutdown_token: CancellationToken,
}

impl LogStreamClient {
    pub fn new(
        config: LogStreamConfig,
        session: SessionHandle,
        event_tx: mpsc::Sender<LogEvent>,
    ) -> Self {
        let keepalive = KeepAlive::new(config.keepalive_interval_ms);
        Self {
            config,
            session,
            state: RwLock::new(StreamState::Connecting),
            last_error: RwLock::new(None),
            keepalive,
            event_tx,
            reconnect_count: RwLock::new(0),
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> StreamState {
        *self.state.read()
    }

    pub fn status(&self) -> StreamStatus {
        StreamStatus::new(self.state(), self.last_error.read().clone())
    }

    pub fn keepalive(&self) -> &KeepAlive {
        &self.keepalive
    }

    /// Consecutive reconnects since the last successful handshake.
    pub fn reconnect_count(&self) -> u32 {
        *self.reconnect_count.read()
    }

    /// Tear down: close the socket, cancel any pending reconnect, stop events.
    pub fn shutdown(&self) {
        info!("Log stream shutdown requested");
        self.shutdown_token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Connect and keep reconnecting until shutdown.
    pub async fn connect(&self) -> WsResult<()> {
        loop {
            if self.is_shutdown() {
                info!("Shutdown requested, exiting log stream loop");
                *self.state.write() = StreamState::Closed;
                return Ok(());
            }

            let Some(token) = self.session.token() else {
                debug!("No session token, skipping log stream connection");
                self.set_state(StreamState::Closed, None).await;
                return Ok(());
            };

            self.set_state(StreamState::Connecting, None).await;

            let outcome = self.try_connect(&token).await;
            drop(token);

            if self.is_shutdown() {
                info!("Shutdown requested after disconnect, not reconnecting");
                *self.state.write() = StreamState::Closed;
                return Ok(());
            }

            let message = match outcome {
                Ok(()) => {
                    info!("Log stream closed");
                    CLOSED_MESSAGE
                }
                Err(WsError::ConnectionClosed { code, reason }) => {
                    warn!(code, %reason, "Log stream closed by server");
                    CLOSED_MESSAGE
                }
                Err(e) => {
                    error!(?e, "Log stream connection error");
                    ERROR_MESSAGE
                }
            };

            let attempt = {
                let mut count = self.reconnect_count.write();
                *count += 1;
                *count
            };

            if !self.config.retry.allows(attempt) {
                error!(attempt, "Max log stream reconnects reached");
                self.set_state(StreamState::Closed, Some(message.to_string()))
                    .await;
                return Err(WsError::ReconnectExhausted(attempt - 1));
            }

            self.set_state(StreamState::Reconnecting, Some(message.to_string()))
                .await;

            let delay = self.config.retry.delay();
            warn!(attempt, delay_ms = delay.as_millis(), "Reconnecting log stream");

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown requested during reconnect delay, exiting");
                    *self.state.write() = StreamState::Closed;
                    return Ok(());
                }
            }
        }
    }

    async fn try_connect(&self, token: &AuthToken) -> WsResult<()> {
        let url = self.config.endpoint(&self.session.server_address())?;
        info!(url = %url, "Connecting to log stream");

        let (ws_stream, _response) = tokio::select! {
            result = connect_async_tls_with_config(url.as_str(), None, true, None) => result?,
            () = self.shutdown_token.cancelled() => return Ok(()),
        };
        let (mut write, mut read) = ws_stream.split();

        self.set_state(StreamState::Authenticating, None).await;
        write
            .send(Message::Text(ClientFrame::auth(token).to_json()?))
            .await?;
        debug!("Sent auth frame");

        self.keepalive.reset();
        let period = self.keepalive.interval();
        let mut ping_interval = tokio::time::interval_at(Instant::now() + period, period);

        loop {
            let connected = self.state() == StreamState::Connected;

            tokio::select! {
                biased;

                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received in log stream loop");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(?e, "Failed to send Close frame during shutdown");
                    }
                    return Ok(());
                }

                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if self.handle_text_frame(&text).await {
                                // First ping one full interval after the handshake.
                                ping_interval.reset();
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (f.code.into(), f.reason.to_string()))
                                .unwrap_or((1000, "Normal close".to_string()));
                            return Err(WsError::ConnectionClosed { code, reason });
                        }
                        Some(Err(e)) => {
                            return Err(e.into());
                        }
                        None => {
                            warn!("Log stream ended");
                            return Ok(());
                        }
                        _ => {}
                    }
                }

                _ = ping_interval.tick(), if connected => {
                    write.send(Message::Text(ClientFrame::Ping.to_json()?)).await?;
                    self.keepalive.record_ping();
                    debug!("Sent keep-alive ping");
                }
            }
        }
    }

    /// Handle one text frame. Returns `true` when the handshake completed.
    async fn handle_text_frame(&self, text: &str) -> bool {
        self.keepalive.record_message();

        match decode_frame(text) {
            ServerFrame::AuthOk => {
                if self.state() == StreamState::Connected {
                    debug!("Duplicate auth_ok ignored");
                    return false;
                }
                *self.reconnect_count.write() = 0;
                self.set_state(StreamState::Connected, None).await;
                info!("Log stream authenticated");
                true
            }
            ServerFrame::Pong => {
                self.keepalive.record_pong();
                false
            }
            ServerFrame::Log(line) => {
                if !line.trim().is_empty() {
                    self.emit(LogEvent::Line(line)).await;
                }
                false
            }
            ServerFrame::Unrecognized(raw) => {
                debug!(frame = %raw, "Unrecognized log stream frame");
                self.emit(LogEvent::Unrecognized(raw)).await;
                false
            }
        }
    }

    async fn set_state(&self, state: StreamState, error: Option<String>) {
        *self.state.write() = state;
        *self.last_error.write() = error.clone();
        debug!(state = state.as_str(), "Log stream state changed");
        self.emit(LogEvent::Status(StreamStatus::new(state, error)))
            .await;
    }

    async fn emit(&self, event: LogEvent) {
        if self.is_shutdown() {
            return;
        }
        if self.event_tx.send(event).await.is_err() {
            debug!("Log event receiver dropped");
        }
    }
}
