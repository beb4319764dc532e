//! SQLite-based per-day session log storage.
//!
//! Provides persistent storage for:
//! - One session log document per (user, day)
//! - Per-day statistics derived from those logs
//! - Key-value store for application state (e.g. a parked timer)

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::timer::{SessionLog, TimerMode};

/// Totals for one mode within a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStats {
    pub completed: u64,
    pub skipped: u64,
    pub minutes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub date_key: String,
    pub work: ModeStats,
    pub short_break: ModeStats,
    pub long_break: ModeStats,
}

impl DayStats {
    pub fn from_log(date_key: &str, log: &SessionLog) -> Self {
        let mut stats = DayStats {
            date_key: date_key.to_string(),
            ..Default::default()
        };
        for record in log {
            let bucket = match record.mode {
                TimerMode::Work => &mut stats.work,
                TimerMode::ShortBreak => &mut stats.short_break,
                TimerMode::LongBreak => &mut stats.long_break,
            };
            if record.completed {
                bucket.completed += 1;
            } else {
                bucket.skipped += 1;
            }
            bucket.minutes += record.duration_minutes;
        }
        stats
    }
}

/// SQLite database for session logs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/focusdeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("focusdeck.db"))
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

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS day_logs (
                    user          TEXT NOT NULL,
                    date_key      TEXT NOT NULL,
                    sessions_json TEXT NOT NULL,
                    updated_at    TEXT NOT NULL,
                    PRIMARY KEY (user, date_key)
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Replace the stored log for `user` on `date_key`.
    pub fn save_day_log(&self, user: &str, date_key: &str, log: &SessionLog) -> Result<()> {
        let json = serde_json::to_string(log)?;
        self.conn.execute(
            "INSERT INTO day_logs (user, date_key, sessions_json, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user, date_key) DO UPDATE SET
                sessions_json = excluded.sessions_json,
                updated_at = excluded.updated_at",
            params![user, date_key, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Stored log for the day, empty if nothing was saved.
    pub fn load_day_log(&self, user: &str, date_key: &str) -> Result<SessionLog> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT sessions_json FROM day_logs WHERE user = ?1 AND date_key = ?2",
                params![user, date_key],
                |row| row.get(0),
            )
            .optional()?;
        let Some(json) = json else {
            return Ok(SessionLog::new());
        };
        serde_json::from_str(&json).map_err(|e| {
            DatabaseError::CorruptLog {
                user: user.to_string(),
                date_key: date_key.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Day keys with a stored log, newest first.
    pub fn list_days(&self, user: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date_key FROM day_logs WHERE user = ?1 ORDER BY date_key DESC")?;
        let rows = stmt.query_map(params![user], |row| row.get::<_, String>(0))?;
        let mut days = Vec::new();
        for row in rows {
            days.push(row?);
        }
        Ok(days)
    }

    pub fn day_stats(&self, user: &str, date_key: &str) -> Result<DayStats> {
        let log = self.load_day_log(user, date_key)?;
        Ok(DayStats::from_log(date_key, &log))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
