//! Session persistence.
//!
//! A store holds two key/value entries: the auth token and the server
//! address. Absence of a token is a valid state, not an error.

use crate::error::{SessionError, SessionResult};
use crate::token::AuthToken;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Server address used when none has been stored.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";

/// Persistence seam for the session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Stored token, if any.
    fn token(&self) -> SessionResult<Option<AuthToken>>;

    fn set_token(&self, token: &AuthToken) -> SessionResult<()>;

    fn clear_token(&self) -> SessionResult<()>;

    /// Stored server address, or [`DEFAULT_SERVER_ADDRESS`].
    fn server_address(&self) -> SessionResult<String>;

    fn set_server_address(&self, address: &str) -> SessionResult<()>;
}

/// Check that an address is a bare `host:port` (or `host`) with no scheme or path.
pub fn validate_server_address(address: &str) -> SessionResult<()> {
    let invalid = address.is_empty()
        || address.contains("://")
        || address.contains('/')
        || address.chars().any(char::is_whitespace);

    if invalid {
        return Err(SessionError::InvalidServerAddress(address.to_string()));
    }
    Ok(())
}

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(
        rename = "serverAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    server_address: Option<String>,
}

// ============================================================================
// FileSessionStore
// ============================================================================

/// JSON file backed store.
///
/// Every write rewrites the whole document through a temporary file, so a
/// crash mid-write leaves the previous session intact.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> SessionResult<StoredSession> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(StoredSession::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, doc: &StoredSession) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Session written");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut StoredSession)) -> SessionResult<()> {
        let _guard = self.lock.lock();
        let mut doc = self.read_document()?;
        f(&mut doc);
        self.write_document(&doc)
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> SessionResult<Option<AuthToken>> {
        let _guard = self.lock.lock();
        match self.read_document()?.auth_token {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(AuthToken::new(raw)?)),
            _ => Ok(None),
        }
    }

    fn set_token(&self, token: &AuthToken) -> SessionResult<()> {
        let token = token.as_str().to_string();
        self.update(|doc| doc.auth_token = Some(token))
    }

    fn clear_token(&self) -> SessionResult<()> {
        self.update(|doc| doc.auth_token = None)
    }

    fn server_address(&self) -> SessionResult<String> {
        let _guard = self.lock.lock();
        Ok(self
            .read_document()?
            .server_address
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()))
    }

    fn set_server_address(&self, address: &str) -> SessionResult<()> {
        validate_server_address(address)?;
        let address = address.to_string();
        self.update(|doc| doc.server_address = Some(address))
    }
}

// ============================================================================
// MemorySessionStore
// ============================================================================

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<AuthToken>>,
    server_address: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a token.
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            server_address: Mutex::new(None),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> SessionResult<Option<AuthToken>> {
        Ok(self.token.lock().clone())
    }

    fn set_token(&self, token: &AuthToken) -> SessionResult<()> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    fn clear_token(&self) -> SessionResult<()> {
        *self.token.lock() = None;
        Ok(())
    }

    fn server_address(&self) -> SessionResult<String> {
        Ok(self
            .server_address
            .lock()
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()))
    }

    fn set_server_address(&self, address: &str) -> SessionResult<()> {
        validate_server_address(address)?;
        *self.server_address.lock() = Some(address.to_string());
        Ok(())
    }
}
