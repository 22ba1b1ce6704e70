//! Integration test support for gk-api.

pub mod common;
