//! Request and response records exchanged with the Gatekeeper API.
//!
//! Field names follow the server's camelCase JSON.

use crate::player::PlayerId;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ============================================================================
// Authentication
// ============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// ============================================================================
// Commands
// ============================================================================

/// Body of `POST /api/gatekeeper/execute-command`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteCommandRequest {
    pub command: String,
}

/// Body of `POST /api/gatekeeper/player/{id}/kick`.
#[derive(Debug, Clone, Serialize)]
pub struct KickRequest {
    pub reason: String,
}

/// Body of `POST /api/gatekeeper/player/{id}/message`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub message: String,
}

/// Result of a command, kick or private message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// One row of the command console history.
#[derive(Debug, Clone, Serialize)]
pub struct CommandHistoryEntry {
    pub command: String,
    pub response: String,
    pub success: bool,
    pub timestamp: DateTime<Local>,
}

impl CommandHistoryEntry {
    pub fn new(command: impl Into<String>, response: impl Into<String>, success: bool) -> Self {
        Self {
            command: command.into(),
            response: response.into(),
            success,
            timestamp: Local::now(),
        }
    }
}

// ============================================================================
// Players
// ============================================================================

/// Roster row from `GET /api/gatekeeper/online-players`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_online: bool,
}

/// Response of `GET /api/gatekeeper/online-players`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayersResponse {
    #[serde(default)]
    pub players: Vec<Player>,
}

/// Player position in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLocation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub world: String,
}

impl PlayerLocation {
    /// Location as displayed in the detail panel: `world (x, y, z)` with
    /// coordinates rounded to whole blocks.
    pub fn display(&self) -> String {
        format!(
            "{} ({}, {}, {})",
            self.world,
            self.x.round() as i64,
            self.y.round() as i64,
            self.z.round() as i64
        )
    }
}

/// Expanded player info from `GET /api/gatekeeper/player/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetails {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_online: bool,
    pub level: i64,
    pub exp: f64,
    pub game_mode: String,
    pub is_op: bool,
    pub ping: i64,
    pub health: f64,
    pub location: PlayerLocation,
}

// ============================================================================
// Health
// ============================================================================

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Server uptime in seconds. Some servers report fractional seconds.
    pub uptime: f64,
}

impl HealthResponse {
    /// Uptime truncated to whole seconds. Negative or NaN values become 0.
    pub fn uptime_secs(&self) -> u64 {
        self.uptime as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_details_camel_case() {
        let raw = r#"{
            "id": "p-1",
            "name": "Steve",
            "isOnline": true,
            "level": 30,
            "exp": 0.42,
            "gameMode": "SURVIVAL",
            "isOp": false,
            "ping": 23,
            "health": 19.5,
            "location": {"x": 10.6, "y": 64.0, "z": -3.4, "world": "world"}
        }"#;

        let details: PlayerDetails = serde_json::from_str(raw).unwrap();
        assert_eq!(details.id.as_str(), "p-1");
        assert_eq!(details.game_mode, "SURVIVAL");
        assert!(details.is_online);
        assert!(!details.is_op);
        assert_eq!(details.location.display(), "world (11, 64, -3)");
    }

    #[test]
    fn test_players_response_missing_list_is_empty() {
        let resp: PlayersResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.players.is_empty());
    }

    #[test]
    fn test_roster_row_with_blank_id_rejected() {
        let blank = r#"{"players": [{"id": "  ", "name": "Ghost"}]}"#;
        assert!(serde_json::from_str::<PlayersResponse>(blank).is_err());

        let padded = r#"{"players": [{"id": " p-2 ", "name": "Alex"}]}"#;
        let resp: PlayersResponse = serde_json::from_str(padded).unwrap();
        assert_eq!(resp.players[0].id.as_str(), "p-2");
    }

    #[test]
    fn test_health_accepts_integer_and_float() {
        let int: HealthResponse = serde_json::from_str(r#"{"uptime": 90061}"#).unwrap();
        assert_eq!(int.uptime_secs(), 90061);

        let float: HealthResponse = serde_json::from_str(r#"{"uptime": 12.9}"#).unwrap();
        assert_eq!(float.uptime_secs(), 12);

        let negative = HealthResponse { uptime: -5.0 };
        assert_eq!(negative.uptime_secs(), 0);
    }

    #[test]
    fn test_command_response_message_optional() {
        let resp: CommandResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.success);
        assert!(resp.message.is_empty());
    }
}
