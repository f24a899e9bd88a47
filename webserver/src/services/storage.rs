//! SQLite storage owning the single shared connection
//!
//! Rows are append-only, so one connection behind a mutex is enough: writes
//! are serialized and each request does exactly one insert. Queries run on
//! the blocking thread pool.

use rusqlite::Connection;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shared::{component_debug, component_info, component_warn, Component, ServerConfig};

use crate::error::{WebServerError, WebServerResult};
use crate::services::repository::{SqliteRepository, StoredRecord};

/// Schema for the four result tables
const MIGRATIONS: &str = "
    CREATE TABLE IF NOT EXISTS traffic_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        policy TEXT NOT NULL,
        intersections INTEGER,
        approaches INTEGER,
        demand TEXT,
        vehicle_count INTEGER,
        avg_speed REAL,
        signal_cycle INTEGER,
        score REAL NOT NULL,
        payload TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_traffic_created ON traffic_results(created_at);

    CREATE TABLE IF NOT EXISTS health_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        model TEXT NOT NULL,
        inputs TEXT NOT NULL,
        score REAL NOT NULL,
        payload TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_health_created ON health_results(created_at);

    CREATE TABLE IF NOT EXISTS city_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        seed INTEGER NOT NULL,
        grid_size INTEGER NOT NULL,
        max_height INTEGER NOT NULL,
        sustainability_score REAL NOT NULL,
        payload TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_city_created ON city_results(created_at);

    CREATE TABLE IF NOT EXISTS audit_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        data_content TEXT NOT NULL,
        wallet_address TEXT NOT NULL,
        data_hash TEXT NOT NULL,
        transaction_hash TEXT NOT NULL,
        hashed_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_audit_created ON audit_results(created_at);
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// WAL journal, NORMAL sync and a busy timeout for file-backed databases
fn apply_file_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    let mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    if !mode.eq_ignore_ascii_case("wal") {
        component_warn!(Component::Storage, journal_mode = %mode, "WAL mode unavailable");
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

#[derive(Clone)]
pub struct Storage {
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Open (or create) a database file and apply the schema
    pub fn open(path: &Path) -> WebServerResult<Self> {
        let conn = Connection::open(path)?;
        apply_file_pragmas(&conn)?;
        component_info!(Component::Storage, path = %path.display(), "Opened database file");
        Self::initialize(conn)
    }

    /// Open a private in-memory database (tests and ephemeral runs)
    pub fn open_in_memory() -> WebServerResult<Self> {
        let conn = Connection::open_in_memory()?;
        component_info!(Component::Storage, "Opened in-memory database");
        Self::initialize(conn)
    }

    /// Open whatever `config.database_path` points at
    pub fn from_config(config: &ServerConfig) -> WebServerResult<Self> {
        if config.is_in_memory() {
            Self::open_in_memory()
        } else {
            Self::open(Path::new(&config.database_path))
        }
    }

    fn initialize(conn: Connection) -> WebServerResult<Self> {
        conn.execute_batch(MIGRATIONS)?;
        component_debug!(Component::Storage, "Schema migrations applied");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn with_conn<F, T>(&self, f: F) -> WebServerResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| WebServerError::StoragePoisoned)?;
            f(&guard).map_err(WebServerError::from)
        })
        .await
        .map_err(|e| WebServerError::TaskJoin(e.to_string()))?
    }

    /// Repository for one record type backed by this storage
    pub fn repository<R: StoredRecord>(&self) -> SqliteRepository<R> {
        SqliteRepository {
            storage: self.clone(),
            _record: PhantomData,
        }
    }
}
