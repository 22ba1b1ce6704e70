//! Keep-alive bookkeeping for the log stream.
//!
//! Tracks ping/pong timing and message activity. A missing pong is only
//! logged; the socket's own close/error events drive reconnection.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Shortest ping period; `tokio::time::interval` rejects zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Keep-alive state for one connection.
pub struct KeepAlive {
    /// How often to ping while connected.
    interval_ms: u64,
    last_ping: RwLock<Option<DateTime<Utc>>>,
    last_pong: RwLock<Option<DateTime<Utc>>>,
    /// Last frame of any kind.
    last_message: RwLock<DateTime<Utc>>,
    awaiting_pong: RwLock<bool>,
}

impl KeepAlive {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ping: RwLock::new(None),
            last_pong: RwLock::new(None),
            last_message: RwLock::new(Utc::now()),
            awaiting_pong: RwLock::new(false),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms).max(MIN_INTERVAL)
    }

    /// Reset state (called on every new socket).
    pub fn reset(&self) {
        *self.last_ping.write() = None;
        *self.last_pong.write() = None;
        *self.last_message.write() = Utc::now();
        *self.awaiting_pong.write() = false;
    }

    /// Record an outgoing ping. Returns `true` when the previous ping was
    /// never answered.
    pub fn record_ping(&self) -> bool {
        let now = Utc::now();
        let missed = *self.awaiting_pong.read();
        if missed {
            let idle_ms = (now - *self.last_message.read()).num_milliseconds();
            warn!(idle_ms, "Keep-alive pong missed");
        }
        *self.last_ping.write() = Some(now);
        *self.awaiting_pong.write() = true;
        missed
    }

    pub fn record_pong(&self) {
        let now = Utc::now();
        *self.last_pong.write() = Some(now);
        *self.awaiting_pong.write() = false;

        if let Some(ping_time) = *self.last_ping.read() {
            let rtt_ms = (now - ping_time).num_milliseconds();
            debug!(rtt_ms, "Received pong");
        }
    }

    pub fn record_message(&self) {
        *self.last_message.write() = Utc::now();
    }

    pub fn stats(&self) -> KeepAliveStats {
        KeepAliveStats {
            last_ping: *self.last_ping.read(),
            last_pong: *self.last_pong.read(),
            last_message: *self.last_message.read(),
            awaiting_pong: *self.awaiting_pong.read(),
        }
    }
}

/// Keep-alive statistics.
#[derive(Debug, Clone)]
pub struct KeepAliveStats {
    pub last_ping: Option<DateTime<Utc>>,
    pub last_pong: Option<DateTime<Utc>>,
    pub last_message: DateTime<Utc>,
    pub awaiting_pong: bool,
}
