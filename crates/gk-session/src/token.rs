//! Bearer token.

use crate::error::{SessionError, SessionResult};
use std::fmt;
use zeroize::Zeroizing;

/// Opaque bearer token issued at login.
///
/// The backing string is wiped on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a token string, rejecting blank input.
    pub fn new(token: impl Into<String>) -> SessionResult<Self> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(SessionError::InvalidToken("token is empty".to_string()));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.as_str())
    }
}

impl PartialEq for AuthToken {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for AuthToken {}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
