//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subsystem that emitted a log line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Server,
    Traffic,
    Health,
    City,
    Audit,
    Stats,
    Storage,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Server => "server",
            Component::Traffic => "traffic",
            Component::Health => "health",
            Component::City => "city",
            Component::Audit => "audit",
            Component::Stats => "stats",
            Component::Storage => "storage",
        };
        f.write_str(name)
    }
}

/// Largest grid a single generation request may ask for
pub const DEFAULT_MAX_GRID_SIZE: u32 = 100;

/// Web server configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub log_level: String,
    pub max_grid_size: u32,
}

impl ServerConfig {
    /// Database path that keeps everything in memory
    pub const IN_MEMORY: &'static str = ":memory:";

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Self::IN_MEMORY
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            database_path: "smart_city.db".to_string(),
            log_level: "info".to_string(),
            max_grid_size: DEFAULT_MAX_GRID_SIZE,
        }
    }
}
