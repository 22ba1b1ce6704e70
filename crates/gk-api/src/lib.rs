//! REST client for the Gatekeeper administration API.
//!
//! Every operation is a single request/response pair against
//! `{scheme}://{server_address}`, where the server address is read from the
//! injected session at call time. Authenticated operations attach
//! `Authorization: Bearer <token>` and fail with
//! [`ApiError::NotAuthenticated`] before sending anything when logged out.

pub mod client;
pub mod error;

pub use client::{ApiConfig, GatekeeperClient};
pub use error::{ApiError, ApiResult};
