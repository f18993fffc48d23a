//! Command implementations.
//!
//! CHANGELOG:
//! - 10/16/2026 - search, stats, normalize, compare

pub mod search;
pub mod text;
