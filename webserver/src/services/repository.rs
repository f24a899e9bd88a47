//! SQLite-backed repositories for each record type

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::marker::PhantomData;
use std::time::Duration;

use shared::{HealthRequest, TrafficRequest};

use crate::error::{WebServerError, WebServerResult};
use crate::services::storage::Storage;
use crate::traits::Repository;
use crate::types::{AuditRecord, CityRecord, HealthRecord, TrafficRecord};

/// How a record type maps onto its table
pub trait StoredRecord: Send + Sync + 'static {
    const TABLE: &'static str;

    /// Column averaged by `average_score_since`, if the table has one
    const SCORE_COLUMN: Option<&'static str>;

    fn insert(&self, conn: &Connection, created_at: &str) -> rusqlite::Result<()>;
}

/// Timestamps are stored as millisecond RFC 3339 UTC so text order is time order
pub fn storage_timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn cutoff(window: Duration) -> WebServerResult<String> {
    let window = chrono::Duration::from_std(window)
        .map_err(|e| WebServerError::config(format!("Invalid stats window: {e}")))?;
    Ok(storage_timestamp(Utc::now() - window))
}

fn to_json<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub struct SqliteRepository<R> {
    pub(crate) storage: Storage,
    pub(crate) _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqliteRepository<R> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: StoredRecord> SqliteRepository<R> {
    pub fn new(storage: Storage) -> Self {
        storage.repository()
    }
}

#[async_trait]
impl<R: StoredRecord> Repository<R> for SqliteRepository<R> {
    async fn save(&self, record: R) -> WebServerResult<i64> {
        let created_at = storage_timestamp(Utc::now());
        self.storage
            .with_conn(move |conn| {
                record.insert(conn, &created_at)?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    async fn count(&self) -> WebServerResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = self
            .storage
            .with_conn(move |conn| conn.query_row(&sql, [], |row| row.get(0)))
            .await?;
        Ok(count as u64)
    }

    async fn count_since(&self, window: Duration) -> WebServerResult<u64> {
        let since = cutoff(window)?;
        let sql = format!("SELECT COUNT(*) FROM {} WHERE created_at >= ?1", R::TABLE);
        let count: i64 = self
            .storage
            .with_conn(move |conn| conn.query_row(&sql, params![since], |row| row.get(0)))
            .await?;
        Ok(count as u64)
    }

    async fn average_score_since(&self, window: Duration) -> WebServerResult<f64> {
        let Some(column) = R::SCORE_COLUMN else {
            return Ok(0.0);
        };
        let since = cutoff(window)?;
        let sql = format!("SELECT AVG({column}) FROM {} WHERE created_at >= ?1", R::TABLE);
        let average: Option<f64> = self
            .storage
            .with_conn(move |conn| conn.query_row(&sql, params![since], |row| row.get(0)))
            .await?;
        Ok(average.unwrap_or(0.0))
    }
}

impl StoredRecord for TrafficRecord {
    const TABLE: &'static str = "traffic_results";
    const SCORE_COLUMN: Option<&'static str> = Some("score");

    fn insert(&self, conn: &Connection, created_at: &str) -> rusqlite::Result<()> {
        let (intersections, approaches, demand, vehicle_count, avg_speed, signal_cycle) = match &self.request {
            TrafficRequest::Proportional(input) => (
                Some(input.intersections),
                Some(input.approaches),
                Some(to_json(&input.demand)?),
                None,
                None,
                None,
            ),
            TrafficRequest::Density(input) => (
                None,
                None,
                None,
                Some(input.vehicle_count),
                Some(input.avg_speed),
                Some(input.signal_cycle),
            ),
        };

        conn.execute(
            "INSERT INTO traffic_results
                (created_at, policy, intersections, approaches, demand,
                 vehicle_count, avg_speed, signal_cycle, score, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                created_at,
                self.plan.policy().as_str(),
                intersections,
                approaches,
                demand,
                vehicle_count,
                avg_speed,
                signal_cycle,
                self.plan.score_percent(),
                to_json(&self.plan)?,
            ],
        )?;
        Ok(())
    }
}

impl StoredRecord for HealthRecord {
    const TABLE: &'static str = "health_results";
    const SCORE_COLUMN: Option<&'static str> = Some("score");

    fn insert(&self, conn: &Connection, created_at: &str) -> rusqlite::Result<()> {
        let inputs = match &self.request {
            HealthRequest::Weighted(input) => to_json(input)?,
            HealthRequest::Risk(input) => to_json(input)?,
        };

        conn.execute(
            "INSERT INTO health_results (created_at, model, inputs, score, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                created_at,
                self.report.model().as_str(),
                inputs,
                self.report.health_score(),
                to_json(&self.report)?,
            ],
        )?;
        Ok(())
    }
}

impl StoredRecord for CityRecord {
    const TABLE: &'static str = "city_results";
    const SCORE_COLUMN: Option<&'static str> = Some("sustainability_score");

    fn insert(&self, conn: &Connection, created_at: &str) -> rusqlite::Result<()> {
        let payload = serde_json::json!({
            "statistics": self.statistics,
            "sustainable_features": self.features,
        });

        conn.execute(
            "INSERT INTO city_results
                (created_at, seed, grid_size, max_height, sustainability_score, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                created_at,
                self.params.seed,
                self.params.grid_size,
                self.params.max_height,
                self.statistics.sustainability_score,
                payload.to_string(),
            ],
        )?;
        Ok(())
    }
}

impl StoredRecord for AuditRecord {
    const TABLE: &'static str = "audit_results";
    const SCORE_COLUMN: Option<&'static str> = None;

    fn insert(&self, conn: &Connection, created_at: &str) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO audit_results
                (created_at, data_content, wallet_address, data_hash, transaction_hash, hashed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                created_at,
                self.request.data_content,
                self.request.wallet_address,
                self.digests.data_hash,
                self.digests.transaction_hash,
                self.digests.hashed_at,
            ],
        )?;
        Ok(())
    }
}
