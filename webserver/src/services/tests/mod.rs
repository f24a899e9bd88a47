//! Service tests for webserver
//!
//! Storage, repository and aggregation tests run against in-memory SQLite
//! unless they need a real file.

pub mod helpers;
