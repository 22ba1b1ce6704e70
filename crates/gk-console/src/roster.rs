//! Online player roster.

use crate::detail::PlayerDetailPanel;
use gk_api::GatekeeperClient;
use gk_core::{Player, PlayerId};
use gk_telemetry::Metrics;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the roster currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterView {
    Loading,
    Failed,
    Empty,
    Players(Vec<Player>),
}

impl RosterView {
    pub fn render(&self) -> String {
        match self {
            Self::Loading => "Loading...".to_string(),
            Self::Failed => "Failed to load players".to_string(),
            Self::Empty => "No players online".to_string(),
            Self::Players(players) => players
                .iter()
                .map(render_row)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn render_row(player: &Player) -> String {
    let status = if player.is_online { "online" } else { "offline" };
    format!("{} ({}) [{}]", player.name, player.id, status)
}

/// Roster polled from the server plus the detail panel of the selected player.
pub struct PlayerRoster {
    client: GatekeeperClient,
    view: RwLock<RosterView>,
    selected: RwLock<Option<Arc<PlayerDetailPanel>>>,
}

impl PlayerRoster {
    pub fn new(client: GatekeeperClient) -> Self {
        Self {
            client,
            view: RwLock::new(RosterView::Loading),
            selected: RwLock::new(None),
        }
    }

    pub fn view(&self) -> RosterView {
        self.view.read().clone()
    }

    /// Fetch the roster. Overlapping refreshes are not de-duplicated; the
    /// last one to finish wins.
    pub async fn refresh(&self) -> RosterView {
        let result = self.client.list_players().await;
        Metrics::api_request("online-players", result.is_ok());

        let view = match result {
            Ok(response) if response.players.is_empty() => RosterView::Empty,
            Ok(response) => {
                debug!(count = response.players.len(), "Roster refreshed");
                RosterView::Players(response.players)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load players");
                RosterView::Failed
            }
        };

        *self.view.write() = view.clone();
        view
    }

    /// Load a player's details and open their panel.
    ///
    /// On failure the previous panel (if any) stays as it was.
    pub async fn select(&self, id: &PlayerId) -> Option<Arc<PlayerDetailPanel>> {
        let result = self.client.player_details(id).await;
        Metrics::api_request("player", result.is_ok());

        match result {
            Ok(details) => {
                let panel = Arc::new(PlayerDetailPanel::new(self.client.clone(), details));
                *self.selected.write() = Some(panel.clone());
                Some(panel)
            }
            Err(e) => {
                warn!(player = %id, error = %e, "Failed to load player details");
                None
            }
        }
    }

    /// Open panel, if any. A panel closed by a kick is dropped here.
    pub fn selected(&self) -> Option<Arc<PlayerDetailPanel>> {
        let mut selected = self.selected.write();
        if selected.as_ref().is_some_and(|p| !p.is_open()) {
            *selected = None;
        }
        selected.clone()
    }

    pub fn close_detail(&self) {
        if let Some(panel) = self.selected.write().take() {
            panel.close();
        }
    }
}
