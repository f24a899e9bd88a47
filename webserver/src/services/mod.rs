//! Service implementations
//!
//! SQLite-backed repositories and the stats aggregator built on top of them

pub mod repository;
pub mod stats_aggregator;
pub mod storage;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use repository::{storage_timestamp, SqliteRepository, StoredRecord};
pub use stats_aggregator::{StatsAggregator, STATS_WINDOW};
pub use storage::Storage;
