//! Shared types for the smart city API
//!
//! Contains the request/result data model of every calculator, the
//! validation error taxonomy and the tracing setup used by the server.

pub mod errors;
pub mod logging;
pub mod models;
pub mod types;

pub use errors::*;
pub use models::*;
pub use types::*;
