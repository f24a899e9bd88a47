//! Webserver library for the Solarpunk smart city API
//!
//! Traffic, health, city and audit calculators behind an axum router, with
//! every result persisted to SQLite.

pub mod core;
pub mod error;
pub mod extract;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use extract::{ApiJson, JsonBody};
pub use state::WebServerState;
pub use types::*;
pub use webserver_impl::WebServer;

// Re-export trait definitions
pub use traits::{MockRepository, Repository};

// Re-export service implementations
pub use services::{SqliteRepository, StatsAggregator, Storage, STATS_WINDOW};
