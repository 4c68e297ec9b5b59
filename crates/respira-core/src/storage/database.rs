//! SQLite-backed history storage.
//!
//! Provides persistent storage for:
//! - Completed meditation sessions (append-only)
//! - Key-value store for small pieces of application state

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::history::{History, HistoryEntry};

/// SQLite database for session history.
pub struct Database {
    conn: Connection,
}

impl Database {
    #[cfg(test)]
    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/respira.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("respira.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id   TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                completed    INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_completed_at ON history(completed_at);",
        )?;
        Ok(())
    }

    /// Append one history entry. Returns its row id.
    pub fn append_history(&self, entry: &HistoryEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO history (session_id, completed_at, completed) VALUES (?1, ?2, ?3)",
            params![
                entry.session_id,
                entry.completed_at.to_rfc3339(),
                entry.completed,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All stored entries in insertion order.
    pub fn load_history(&self) -> Result<History> {
        let mut stmt = self
            .conn
            .prepare("SELECT session_id, completed_at, completed FROM history ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (session_id, completed_at, completed) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::CorruptRow {
                    table: "history".into(),
                    message: format!("completed_at '{completed_at}': {e}"),
                })?
                .with_timezone(&Utc);
            entries.push(HistoryEntry {
                session_id,
                completed_at,
                completed,
            });
        }
        Ok(History::from_entries(entries))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn kv_remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn history_round_trip_keeps_order() {
        let db = Database::open_memory().unwrap();
        let first =
            HistoryEntry::completed("3", Utc.with_ymd_and_hms(2026, 5, 2, 7, 0, 0).unwrap());
        let second =
            HistoryEntry::completed("1", Utc.with_ymd_and_hms(2026, 5, 1, 7, 0, 0).unwrap());
        db.append_history(&first).unwrap();
        db.append_history(&second).unwrap();

        let history = db.load_history().unwrap();
        assert_eq!(history.entries(), &[first, second]);
    }

    #[test]
    fn empty_database_has_empty_history() {
        let db = Database::open_memory().unwrap();
        assert!(db.load_history().unwrap().is_empty());
    }

    #[test]
    fn kv_set_get_remove() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("user_name").unwrap(), None);
        db.kv_set("user_name", "Ana").unwrap();
        db.kv_set("user_name", "Bia").unwrap();
        assert_eq!(db.kv_get("user_name").unwrap().as_deref(), Some("Bia"));
        assert!(db.kv_remove("user_name").unwrap());
        assert!(!db.kv_remove("user_name").unwrap());
        assert_eq!(db.kv_get("user_name").unwrap(), None);
    }

    #[test]
    fn corrupt_timestamp_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO history (session_id, completed_at) VALUES ('1', 'yesterday')",
                [],
            )
            .unwrap();
        let err = db.load_history().unwrap_err();
        assert!(err.to_string().contains("Corrupt row in 'history'"));
    }
}
