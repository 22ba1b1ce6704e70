//! Logger WebSocket frames.
//!
//! The client sends `{"type":"auth","token":...}` once after connecting and
//! `{"type":"ping"}` while connected. The server answers with `auth_ok` and
//! `pong` control frames; everything else is log output, either as a
//! `{"type":"log"}` frame or as raw text.

use crate::error::WsResult;
use gk_session::AuthToken;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Client -> server
// ============================================================================

#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Auth { token: String },
    Ping,
}

impl ClientFrame {
    pub fn auth(token: &AuthToken) -> Self {
        Self::Auth {
            token: token.as_str().to_string(),
        }
    }

    pub fn to_json(&self) -> WsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Debug for ClientFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth { .. } => f.write_str("Auth { token: *** }"),
            Self::Ping => f.write_str("Ping"),
        }
    }
}

// ============================================================================
// Server -> client
// ============================================================================

/// Decoded server frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Handshake accepted.
    AuthOk,
    /// Keep-alive answer.
    Pong,
    /// One line of server log output.
    Log(String),
    /// Valid JSON that is none of the known kinds. Carries the original text.
    Unrecognized(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedFrame {
    AuthOk,
    Pong,
    Log {
        #[serde(alias = "data")]
        message: String,
    },
}

/// Decode one inbound text frame.
///
/// Text that is not JSON is raw log output.
pub fn decode_frame(text: &str) -> ServerFrame {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => return ServerFrame::Log(text.to_string()),
    };

    match serde_json::from_value::<TaggedFrame>(value) {
        Ok(TaggedFrame::AuthOk) => ServerFrame::AuthOk,
        Ok(TaggedFrame::Pong) => ServerFrame::Pong,
        Ok(TaggedFrame::Log { message }) => ServerFrame::Log(message),
        Err(_) => ServerFrame::Unrecognized(text.to_string()),
    }
}
