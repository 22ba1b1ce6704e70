//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(#[from] gk_session::SessionError),

    #[error("API error: {0}")]
    Api(#[from] gk_api::ApiError),

    #[error("{0}")]
    Console(#[from] gk_console::ConsoleError),

    #[error("{0}")]
    Shell(#[from] gk_console::ShellError),

    #[error("Log stream error: {0}")]
    Stream(#[from] gk_ws::WsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
