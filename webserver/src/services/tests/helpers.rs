//! Test helpers for webserver service tests

use chrono::Utc;
use rusqlite::params;

use crate::services::{storage_timestamp, Storage};

pub fn memory_storage() -> Storage {
    Storage::open_in_memory().expect("in-memory database should open")
}

/// Move every row of `table` `hours` into the past
pub async fn backdate_all(storage: &Storage, table: &'static str, hours: i64) {
    let created_at = storage_timestamp(Utc::now() - chrono::Duration::hours(hours));
    storage
        .with_conn(move |conn| conn.execute(&format!("UPDATE {table} SET created_at = ?1"), params![created_at]))
        .await
        .expect("backdating rows should succeed");
}

/// Read a single text column from the row with `id`
pub async fn column_text(storage: &Storage, table: &'static str, column: &'static str, id: i64) -> String {
    storage
        .with_conn(move |conn| {
            conn.query_row(&format!("SELECT {column} FROM {table} WHERE id = ?1"), params![id], |row| {
                row.get(0)
            })
        })
        .await
        .expect("row should exist")
}
