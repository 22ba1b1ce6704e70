//! Persisted admin session for the Gatekeeper admin client.
//!
//! The session is two values: the bearer token issued at login and the
//! `host:port` of the administered server.
//!
//! - `SessionStore`: persistence seam (`FileSessionStore`, `MemorySessionStore`)
//! - `SessionManager`: owns the session lifecycle (load, login, logout)
//! - `SessionHandle`: cheap read-only view injected into collaborators

pub mod error;
pub mod manager;
pub mod store;
pub mod token;

pub use error::{SessionError, SessionResult};
pub use manager::{Session, SessionHandle, SessionManager};
pub use store::{
    validate_server_address, FileSessionStore, MemorySessionStore, SessionStore,
    DEFAULT_SERVER_ADDRESS,
};
pub use token::AuthToken;
