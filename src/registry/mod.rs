//! Registry state: dataset loading, immutable snapshots and the store that
//! swaps them on reload.

pub mod dataset;
pub mod snapshot;
pub mod store;

pub use dataset::{load_records, ColumnMapping, LoadError};
pub use snapshot::{SearchOptions, Snapshot};
pub use store::RegistryStore;
