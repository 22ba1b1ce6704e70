//! Live log stream client for the Gatekeeper logger WebSocket.
//!
//! Maintains one authenticated connection to `/ws/gatekeeper/logger`:
//! - Explicit state machine (Connecting, Authenticating, Connected, Reconnecting, Closed)
//! - Token handshake (`auth` → `auth_ok`) before reporting Connected
//! - Keep-alive `ping` every 30s while connected
//! - Fixed-delay reconnection driven by an injectable `RetryPolicy`
//! - Channel-based delivery of log lines and status changes

pub mod connection;
pub mod error;
pub mod keepalive;
pub mod message;
pub mod retry;
pub mod state;

pub use connection::{
    LogStreamClient, LogStreamConfig, CLOSED_MESSAGE, ERROR_MESSAGE, LOGGER_PATH,
};
pub use error::{WsError, WsResult};
pub use keepalive::{KeepAlive, KeepAliveStats};
pub use message::{decode_frame, ClientFrame, ServerFrame};
pub use retry::RetryPolicy;
pub use state::{LogEvent, StreamState, StreamStatus};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any `wss://` or `https://` connection is made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
