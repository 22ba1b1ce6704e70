//! Player detail panel.

use crate::error::{ConsoleError, ConsoleResult};
use gk_api::GatekeeperClient;
use gk_core::PlayerDetails;
use gk_telemetry::Metrics;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Expanded view of one player with message and kick actions.
///
/// Actions are ignored while another request from this panel is in flight.
pub struct PlayerDetailPanel {
    client: GatekeeperClient,
    details: PlayerDetails,
    message_draft: RwLock<String>,
    busy: AtomicBool,
    open: AtomicBool,
}

impl PlayerDetailPanel {
    pub fn new(client: GatekeeperClient, details: PlayerDetails) -> Self {
        Self {
            client,
            details,
            message_draft: RwLock::new(String::new()),
            busy: AtomicBool::new(false),
            open: AtomicBool::new(true),
        }
    }

    pub fn details(&self) -> &PlayerDetails {
        &self.details
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn message_draft(&self) -> String {
        self.message_draft.read().clone()
    }

    /// Send a private message to the player.
    ///
    /// Returns `Ok(false)` when ignored (blank text or busy). Success clears
    /// the draft; failure keeps it.
    pub async fn send_message(&self, text: &str) -> ConsoleResult<bool> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        let Some(_guard) = self.begin()? else {
            return Ok(false);
        };
        *self.message_draft.write() = text.to_string();

        let result = self
            .client
            .send_private_message(&self.details.id, text)
            .await;
        Metrics::api_request("message", result.is_ok());

        match result {
            Ok(_) => {
                info!(player = %self.details.id, "Private message sent");
                self.message_draft.write().clear();
                Ok(true)
            }
            Err(e) => {
                warn!(player = %self.details.id, error = %e, "Failed to send message");
                Err(e.into())
            }
        }
    }

    /// Kick the player. Success closes the panel.
    ///
    /// Returns `Ok(false)` when ignored (blank reason or busy).
    pub async fn kick(&self, reason: &str) -> ConsoleResult<bool> {
        if reason.trim().is_empty() {
            return Ok(false);
        }
        let Some(_guard) = self.begin()? else {
            return Ok(false);
        };

        let result = self.client.kick_player(&self.details.id, reason).await;
        Metrics::api_request("kick", result.is_ok());

        match result {
            Ok(_) => {
                info!(player = %self.details.id, reason, "Player kicked");
                self.close();
                Ok(true)
            }
            Err(e) => {
                warn!(player = %self.details.id, error = %e, "Failed to kick player");
                Err(e.into())
            }
        }
    }

    /// Claim the busy flag. `None` when a request is already in flight.
    fn begin(&self) -> ConsoleResult<Option<BusyGuard<'_>>> {
        if !self.is_open() {
            return Err(ConsoleError::PanelClosed);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }
        Ok(Some(BusyGuard(&self.busy)))
    }

    /// Panel contents, one field per line.
    pub fn render(&self) -> String {
        render_details(&self.details)
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn render_details(details: &PlayerDetails) -> String {
    [
        format!("Name: {}", details.name),
        format!("Online: {}", yes_no(details.is_online)),
        format!("Health: {}/20", details.health),
        format!("Level: {}", details.level),
        format!("Exp: {}", details.exp),
        format!("Game Mode: {}", details.game_mode),
        format!("Operator: {}", yes_no(details.is_op)),
        format!("Ping: {}ms", details.ping),
        format!("Location: {}", details.location.display()),
    ]
    .join("\n")
}
