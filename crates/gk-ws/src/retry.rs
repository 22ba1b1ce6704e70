//! Reconnect policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-delay reconnect policy. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before each reconnect attempt.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Reconnect attempts allowed after the initial connection (0 = unbounded).
    #[serde(default)]
    pub max_reconnects: u32,
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_reconnects: 0,
        }
    }
}

impl RetryPolicy {
    /// Reconnect immediately, forever.
    pub fn immediate() -> Self {
        Self {
            delay_ms: 0,
            max_reconnects: 0,
        }
    }

    /// Same delay, at most `max_reconnects` attempts.
    pub fn bounded(self, max_reconnects: u32) -> Self {
        Self {
            max_reconnects,
            ..self
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Whether reconnect number `attempt` (1-based) may run.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_reconnects == 0 || attempt <= self.max_reconnects
    }
}
