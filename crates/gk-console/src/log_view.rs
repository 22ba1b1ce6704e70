//! Live log view.
//!
//! Consumes [`LogEvent`]s from the log stream client: lines are passed
//! through the configured ANSI strategy and appended to a bounded buffer,
//! status events update the connection indicator.

use crate::ansi::{self, AnsiMode};
use crate::log_buffer::LogBuffer;
use gk_telemetry::Metrics;
use gk_ws::{LogEvent, StreamState, StreamStatus, CLOSED_MESSAGE};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct LogView {
    buffer: RwLock<LogBuffer>,
    status: RwLock<StreamStatus>,
    ansi: AnsiMode,
}

impl LogView {
    pub fn new(capacity: usize, ansi: AnsiMode) -> Self {
        Self {
            buffer: RwLock::new(LogBuffer::new(capacity)),
            status: RwLock::new(StreamStatus::default()),
            ansi,
        }
    }

    pub fn ansi_mode(&self) -> AnsiMode {
        self.ansi
    }

    /// Apply one event. Returns the rendered line when one was appended.
    pub fn apply(&self, event: LogEvent) -> Option<String> {
        match event {
            LogEvent::Status(status) => {
                self.record_status(&status);
                *self.status.write() = status;
                None
            }
            LogEvent::Line(raw) | LogEvent::Unrecognized(raw) => self.push_line(&raw),
        }
    }

    fn push_line(&self, raw: &str) -> Option<String> {
        if ansi::strip(raw).trim().is_empty() {
            return None;
        }
        let line = self.ansi.apply(raw);
        self.buffer.write().push(line.clone());
        Metrics::log_line();
        Some(line)
    }

    fn record_status(&self, status: &StreamStatus) {
        Metrics::log_stream_state(status.state.as_str());
        if status.state == StreamState::Reconnecting {
            let reason = match status.error.as_deref() {
                Some(CLOSED_MESSAGE) => "closed",
                _ => "error",
            };
            Metrics::log_stream_reconnect(reason);
        }
    }

    /// Buffered lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.buffer.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.read().is_empty()
    }

    pub fn status(&self) -> StreamStatus {
        self.status.read().clone()
    }

    /// Connection indicator text.
    pub fn status_text(&self) -> String {
        self.status.read().text().to_string()
    }

    pub fn clear(&self) {
        self.buffer.write().clear();
    }

    /// Drain events into the view until the channel closes or `cancel` fires.
    ///
    /// `on_line` sees every appended line, e.g. to echo it to a terminal.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<LogEvent>,
        cancel: CancellationToken,
        on_line: impl Fn(&str),
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if let Some(line) = self.apply(event) {
                        on_line(&line);
                    }
                }
            }
        }
        debug!("Log view stopped");
    }
}

impl Default for LogView {
    fn default() -> Self {
        Self::new(crate::log_buffer::DEFAULT_LOG_CAPACITY, AnsiMode::default())
    }
}
