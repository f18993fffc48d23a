//! Daemon mode implementation: persistent server with a hot snapshot.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial module structure

pub mod protocol;
pub mod server;
pub mod service;
