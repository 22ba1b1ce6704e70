//! Dashboard controllers for the Gatekeeper admin client.
//!
//! Each controller owns the view state of one dashboard panel and renders
//! the text that panel shows:
//!
//! - `CommandConsole`: command submission and history
//! - `PlayerRoster` / `PlayerDetailPanel`: online players, messaging, kicking
//! - `HealthBadge`: server uptime
//! - `LogView`: live log lines and connection indicator
//! - `DashboardShell`: session gate and background task lifecycle
//!
//! Failures are logged and collapse to the panel's generic failure display.

pub mod ansi;
pub mod command;
pub mod detail;
pub mod error;
pub mod health;
pub mod log_buffer;
pub mod log_view;
pub mod poller;
pub mod roster;
pub mod shell;

pub use ansi::AnsiMode;
pub use command::{render_entry, CommandConsole, COMMAND_FAILED};
pub use detail::{render_details, PlayerDetailPanel};
pub use error::{ConsoleError, ConsoleResult, ShellError, ShellResult};
pub use health::HealthBadge;
pub use log_buffer::{LogBuffer, DEFAULT_LOG_CAPACITY};
pub use log_view::LogView;
pub use poller::spawn_poller;
pub use roster::{PlayerRoster, RosterView};
pub use shell::{DashboardShell, ShellConfig};
