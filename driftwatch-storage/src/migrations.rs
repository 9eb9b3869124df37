//! Versioned schema migrations, tracked via `user_version`.

use rusqlite::Connection;

use driftwatch_core::errors::storage_error::StorageError;

const SCHEMA_VERSION: u32 = 1;

/// Bring the schema up to the current version.
pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    let current: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| migration_error(0, e))?;

    if current < 1 {
        apply_v1(conn)?;
    }

    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| migration_error(SCHEMA_VERSION, e))?;
        tracing::info!(from = current, to = SCHEMA_VERSION, "schema migrated");
    }
    Ok(())
}

/// v1: the analyses table. `payload` is the full analysis document;
/// the scalar columns exist for indexing and SQL-side aggregation.
fn apply_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS analyses (
             id              TEXT PRIMARY KEY,
             pipeline_name   TEXT NOT NULL,
             drift_score     REAL NOT NULL,
             risk_level      TEXT NOT NULL,
             timestamp_ms    INTEGER NOT NULL,
             critical_issues INTEGER NOT NULL,
             payload         TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_analyses_timestamp
             ON analyses (timestamp_ms DESC);
         CREATE INDEX IF NOT EXISTS idx_analyses_pipeline
             ON analyses (pipeline_name);
         CREATE INDEX IF NOT EXISTS idx_analyses_pipeline_timestamp
             ON analyses (pipeline_name, timestamp_ms DESC);",
    )
    .map_err(|e| migration_error(1, e))
}

fn migration_error(version: u32, e: impl std::fmt::Display) -> StorageError {
    StorageError::MigrationFailed { version, message: e.to_string() }
}
