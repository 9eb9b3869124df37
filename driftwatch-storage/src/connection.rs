//! Connection management: open, pragmas, migrations.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;

use driftwatch_core::errors::storage_error::StorageError;

use crate::migrations;

/// Owns the SQLite connection. SQLite serializes writers itself; the mutex
/// keeps the single connection usable across request threads.
pub struct DatabaseManager {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a file-backed database, applying pragmas and migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Sqlite { message: e.to_string() })?;
        }
        let conn = Connection::open(path).map_err(sqe)?;
        conn.pragma_update(None, "journal_mode", "WAL").map_err(sqe)?;
        conn.pragma_update(None, "synchronous", "NORMAL").map_err(sqe)?;
        conn.pragma_update(None, "foreign_keys", "ON").map_err(sqe)?;
        migrations::migrate(&conn)?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(Self { conn: Mutex::new(conn), path: Some(path.to_path_buf()) })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(sqe)?;
        migrations::migrate(&conn)?;
        Ok(Self { conn: Mutex::new(conn), path: None })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run a closure against the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::Sqlite {
            message: "connection mutex poisoned".to_string(),
        })?;
        f(&guard)
    }
}

pub(crate) fn sqe(e: impl std::fmt::Display) -> StorageError {
    StorageError::Sqlite { message: e.to_string() }
}
