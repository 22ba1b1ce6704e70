//! Integration test support for gk-console.

pub mod common;
