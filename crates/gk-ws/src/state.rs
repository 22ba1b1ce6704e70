//! Log stream state and events.

/// Connection state machine.
///
/// ```text
/// Connecting -> Authenticating -> Connected
///      ^              |               |
///      |              v               v
///      +-------- Reconnecting <-------+
///
/// any state -> Closed (shutdown, no token, retries exhausted)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Connecting,
    Authenticating,
    Connected,
    Reconnecting,
    Closed,
}

impl StreamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Closed => "closed",
        }
    }
}

/// State plus the error surfaced with it, as shown by the status indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStatus {
    pub state: StreamState,
    pub error: Option<String>,
}

impl StreamStatus {
    pub fn new(state: StreamState, error: Option<String>) -> Self {
        Self { state, error }
    }

    pub fn is_connected(&self) -> bool {
        self.state == StreamState::Connected
    }

    /// Indicator text: the error if any, otherwise a label for the state.
    pub fn text(&self) -> &str {
        if let Some(error) = &self.error {
            return error;
        }
        match self.state {
            StreamState::Connected => "Connected",
            StreamState::Connecting | StreamState::Authenticating => "Connecting...",
            StreamState::Reconnecting | StreamState::Closed => "Disconnected",
        }
    }
}

impl Default for StreamStatus {
    fn default() -> Self {
        Self::new(StreamState::Connecting, None)
    }
}

/// Event delivered to the log stream consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Status(StreamStatus),
    Line(String),
    /// JSON frame of an unknown kind, verbatim.
    Unrecognized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        assert_eq!(
            StreamStatus::new(StreamState::Authenticating, None).text(),
            "Connecting..."
        );
        assert_eq!(
            StreamStatus::new(StreamState::Connected, None).text(),
            "Connected"
        );
        let reconnecting = StreamStatus::new(
            StreamState::Reconnecting,
            Some("Connection closed, reconnecting...".to_string()),
        );
        assert_eq!(reconnecting.text(), "Connection closed, reconnecting...");
        assert!(!reconnecting.is_connected());
    }
}
