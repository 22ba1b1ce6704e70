//! Integration test support for gk-ws.

pub mod common;
