//! Command console.

use gk_api::GatekeeperClient;
use gk_core::CommandHistoryEntry;
use gk_telemetry::Metrics;
use parking_lot::RwLock;
use tracing::{info, warn};

/// Response recorded for any failed submission.
pub const COMMAND_FAILED: &str = "Failed to execute command";

/// Submits admin commands and keeps an in-memory history.
///
/// History is unbounded and lives as long as the console.
pub struct CommandConsole {
    client: GatekeeperClient,
    /// Oldest first.
    history: RwLock<Vec<CommandHistoryEntry>>,
}

impl CommandConsole {
    pub fn new(client: GatekeeperClient) -> Self {
        Self {
            client,
            history: RwLock::new(Vec::new()),
        }
    }

    /// Execute a command and record the outcome.
    ///
    /// Blank input is ignored and returns `None`. Otherwise exactly one entry
    /// is recorded and returned.
    pub async fn submit(&self, command: &str) -> Option<CommandHistoryEntry> {
        if command.trim().is_empty() {
            return None;
        }

        let entry = match self.client.execute_command(command).await {
            Ok(response) => {
                Metrics::api_request("execute-command", true);
                info!(command, success = response.success, "Command executed");
                CommandHistoryEntry::new(command, response.message, response.success)
            }
            Err(e) => {
                Metrics::api_request("execute-command", false);
                warn!(command, error = %e, "Command failed");
                CommandHistoryEntry::new(command, COMMAND_FAILED, false)
            }
        };

        self.history.write().push(entry.clone());
        Some(entry)
    }

    /// Execute a command without recording history.
    ///
    /// Output is expected on the log stream. Returns whether the request
    /// succeeded; blank input returns `false` without a request.
    pub async fn submit_quiet(&self, command: &str) -> bool {
        if command.trim().is_empty() {
            return false;
        }
        match self.client.execute_command(command).await {
            Ok(_) => {
                Metrics::api_request("execute-command", true);
                true
            }
            Err(e) => {
                Metrics::api_request("execute-command", false);
                warn!(command, error = %e, "Command failed");
                false
            }
        }
    }

    /// History, most recent first.
    pub fn history(&self) -> Vec<CommandHistoryEntry> {
        self.history.read().iter().rev().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history.read().len()
    }
}

/// One history entry as shown in the console.
pub fn render_entry(entry: &CommandHistoryEntry) -> String {
    let marker = if entry.success { "ok" } else { "failed" };
    format!(
        "[{}] > {} ({})\n  {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.command,
        marker,
        entry.response
    )
}
