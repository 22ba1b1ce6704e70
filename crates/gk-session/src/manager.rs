//! Session lifecycle.
//!
//! `SessionManager` is the single writer. Every collaborator that needs the
//! token or the server address receives a `SessionHandle` instead of reading
//! storage directly.

use crate::error::{SessionError, SessionResult};
use crate::store::{validate_server_address, SessionStore, DEFAULT_SERVER_ADDRESS};
use crate::token::AuthToken;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// In-memory session state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: Option<AuthToken>,
    pub server_address: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
        }
    }
}

/// Owner of the session lifecycle.
///
/// Writes go to the store first and then to memory, so a failed write leaves
/// both sides unchanged.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    session: Arc<RwLock<Session>>,
}

impl SessionManager {
    /// Load the session from `store`.
    pub fn open(store: Arc<dyn SessionStore>) -> SessionResult<Self> {
        let session = Session {
            token: store.token()?,
            server_address: store.server_address()?,
        };
        info!(
            server_address = %session.server_address,
            authenticated = session.token.is_some(),
            "Session loaded"
        );

        Ok(Self {
            store,
            session: Arc::new(RwLock::new(session)),
        })
    }

    /// Read-only handle sharing this manager's state.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            session: self.session.clone(),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    /// Record a successful login.
    pub fn begin(&self, token: AuthToken) -> SessionResult<()> {
        self.store.set_token(&token)?;
        self.session.write().token = Some(token);
        info!("Session started");
        Ok(())
    }

    /// Log out: drop the token, keep the server address.
    pub fn end(&self) -> SessionResult<()> {
        self.store.clear_token()?;
        self.session.write().token = None;
        info!("Session ended");
        Ok(())
    }

    pub fn set_server_address(&self, address: &str) -> SessionResult<()> {
        validate_server_address(address)?;
        self.store.set_server_address(address)?;
        self.session.write().server_address = address.to_string();
        info!(server_address = %address, "Server address updated");
        Ok(())
    }

    /// Run a lifecycle call on the blocking pool.
    ///
    /// Stores may do synchronous file I/O; async callers go through here.
    pub async fn run_blocking<T, F>(self: &Arc<Self>, f: F) -> SessionResult<T>
    where
        F: FnOnce(&SessionManager) -> SessionResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let manager = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&manager)).await?
    }
}

/// Cloneable read view of the current session.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<RwLock<Session>>,
}

impl SessionHandle {
    /// Handle over a fixed session that no manager writes to.
    pub fn detached(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.session.read().token.clone()
    }

    /// Token, or `NotAuthenticated` when logged out.
    pub fn require_token(&self) -> SessionResult<AuthToken> {
        self.token().ok_or(SessionError::NotAuthenticated)
    }

    pub fn server_address(&self) -> String {
        self.session.read().server_address.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().token.is_some()
    }
}
