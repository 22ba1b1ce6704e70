//! Controller error types.

use gk_api::ApiError;
use gk_session::SessionError;
use thiserror::Error;

/// Failure of a user-triggered action.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Player panel is closed")]
    PanelClosed,
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Dashboard lifecycle errors.
#[derive(Debug, Error)]
pub enum ShellError {
    /// No session token; the caller should send the user to login.
    #[error("Not authenticated, login required")]
    NotAuthenticated,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

pub type ShellResult<T> = Result<T, ShellError>;
