//! name-similarity library
//!
//! Fuzzy lookup over a historical name registry: canonicalize noisy names,
//! block records by canonical prefix, rank candidates by Jaro-Winkler.
//!
//! CHANGELOG:
//! - 10/14/2026 - Initial library structure

pub mod config;
pub mod daemon;
pub mod matching;
pub mod output;
pub mod registry;
