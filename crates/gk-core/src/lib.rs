//! Core domain types for the Gatekeeper admin client.
//!
//! This crate provides the records exchanged with the Gatekeeper API:
//! - `Player`, `PlayerDetails`: roster rows and expanded player info
//! - `CommandResponse`, `HealthResponse`: operation results
//! - `PlayerId`: identifier newtype used in request paths
//! - `format_uptime`: human-readable uptime for the health badge

pub mod error;
pub mod player;
pub mod types;
pub mod uptime;

pub use error::{CoreError, Result};
pub use player::PlayerId;
pub use types::{
    CommandHistoryEntry, CommandResponse, ExecuteCommandRequest, HealthResponse, KickRequest,
    LoginRequest, LoginResponse, MessageRequest, Player, PlayerDetails, PlayerLocation,
    PlayersResponse,
};
pub use uptime::format_uptime;
