//! Fuzzy name matching: normalization, blocking and Jaro-Winkler ranking.

pub mod fuzzy;
pub mod index;
pub mod normalize;
pub mod ranker;

pub use fuzzy::{jaro, jaro_winkler};
pub use index::{blocking_key, BlockingIndex, IndexedRecord, Record};
pub use normalize::{normalize, normalize_spanish, normalize_with, NormalizeOptions};
pub use ranker::{calculate_similarity, search, SearchHit};
