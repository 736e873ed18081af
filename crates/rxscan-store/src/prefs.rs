// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Durable key-value preferences.
//
// Schema:
//   preferences(
//     namespace TEXT    NOT NULL,   -- e.g. "PrescriptionPrefs"
//     key       TEXT    NOT NULL,   -- e.g. "total_scans"
//     value     INTEGER NOT NULL,
//     PRIMARY KEY (namespace, key)
//   )

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use rxscan_core::error::{Result, RxscanError};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Local error helpers
// ---------------------------------------------------------------------------

/// Convert a `rusqlite::Error` into an `RxscanError::Database`.
fn db_err(e: rusqlite::Error) -> RxscanError {
    RxscanError::Database(e.to_string())
}

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS preferences (
        namespace TEXT    NOT NULL,
        key       TEXT    NOT NULL,
        value     INTEGER NOT NULL,
        PRIMARY KEY (namespace, key)
    );";

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Integer preferences addressed by fixed string keys.
///
/// `commit` applies all edits together or not at all, like a preferences
/// editor's apply.
pub trait PreferenceStore: Send {
    fn get_i64(&self, key: &str) -> Result<Option<i64>>;

    fn commit(&mut self, edits: &[(&str, i64)]) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        (**self).get_i64(key)
    }

    fn commit(&mut self, edits: &[(&str, i64)]) -> Result<()> {
        (**self).commit(edits)
    }
}

// ---------------------------------------------------------------------------
// SQLite store
// ---------------------------------------------------------------------------

/// Preferences persisted in a SQLite database, scoped to one namespace.
pub struct SqlitePreferences {
    conn: Connection,
    namespace: String,
}

impl SqlitePreferences {
    /// Open (or create) the preference database at `path`.
    ///
    /// WAL mode is enabled so a reader never blocks the scan that is
    /// updating the counters.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), %namespace))]
    pub fn open(path: impl AsRef<Path>, namespace: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("preference store opened");
        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory(namespace: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory preference store opened");
        Ok(Self {
            conn,
            namespace: namespace.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)
    }

    #[instrument(skip_all, fields(namespace = %self.namespace, edits = edits.len()))]
    fn commit(&mut self, edits: &[(&str, i64)]) -> Result<()> {
        let tx = self.conn.transaction().map_err(db_err)?;
        for (key, value) in edits {
            tx.execute(
                "INSERT INTO preferences (namespace, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value",
                params![self.namespace, key, value],
            )
            .map_err(db_err)?;
        }
        tx.commit().map_err(db_err)?;

        debug!("preferences committed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile preferences, for tests and as a fallback when the database
/// cannot be opened.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, i64>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.values.get(key).copied())
    }

    fn commit(&mut self, edits: &[(&str, i64)]) -> Result<()> {
        for (key, value) in edits {
            self.values.insert((*key).to_string(), *value);
        }
        Ok(())
    }
}
