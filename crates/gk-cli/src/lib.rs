//! Terminal admin client for Gatekeeper game servers.
//!
//! Wires the session store, REST client, log stream and dashboard
//! controllers together behind the `gatekeeper` command line.

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
