//! SQLite-backed persistence for the tracked city list.
//!
//! All data lives in a single `city` table. Each operation is a single-row
//! statement, so no cross-record transactions are needed.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, params};
use thiserror::Error;

use crate::model::City;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("city '{0}' is already tracked")]
    DuplicateCity(String),
    #[error("city name is missing")]
    MissingName,
    #[error("could not create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Persisted set of unique city names.
pub trait CityStore: Send + Sync {
    /// Insert a new city. Names are trimmed; blank names and names already
    /// present are rejected without touching the store.
    fn add(&self, name: &str) -> Result<City, StoreError>;

    /// Delete a city by id. Returns `false` if there was nothing to delete.
    fn remove(&self, id: i64) -> Result<bool, StoreError>;

    /// All cities, in insertion order.
    fn list(&self) -> Result<Vec<City>, StoreError>;
}

#[derive(Debug)]
pub struct SqliteCityStore {
    conn: Mutex<Connection>,
}

impl SqliteCityStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS city (
                 id INTEGER PRIMARY KEY,
                 name TEXT NOT NULL UNIQUE
             );",
        )?;

        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl CityStore for SqliteCityStore {
    fn add(&self, name: &str) -> Result<City, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        let conn = self.conn.lock();
        let inserted = conn.execute(
            "INSERT INTO city (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;

        if inserted == 0 {
            return Err(StoreError::DuplicateCity(name.to_string()));
        }

        Ok(City { id: conn.last_insert_rowid(), name: name.to_string() })
    }

    fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let removed = self.conn.lock().execute("DELETE FROM city WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn list(&self) -> Result<Vec<City>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM city ORDER BY id")?;

        let cities = stmt
            .query_map([], |row| Ok(City { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cities)
    }
}
