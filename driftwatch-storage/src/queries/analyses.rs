//! analyses table queries.

use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use driftwatch_core::errors::storage_error::StorageError;
use driftwatch_core::types::analysis::Analysis;
use driftwatch_core::types::report::RollingStats;

use crate::connection::sqe;

/// SQL fragment excluding pipelines whose name marks them as test data.
const NOT_TEST_DATA: &str = "NOT (LOWER(pipeline_name) LIKE '%test%'
       OR LOWER(pipeline_name) LIKE '%sample%'
       OR LOWER(pipeline_name) LIKE '%mock%'
       OR LOWER(pipeline_name) LIKE '%dummy%')";

/// Filters for a history query. `limit` is clamped to [1, 1000].
#[derive(Debug, Clone, Default)]
pub struct AnalysisQuery {
    pub pipeline: Option<String>,
    pub limit: Option<usize>,
    pub since: Option<DateTime<Utc>>,
}

impl AnalysisQuery {
    fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 1000) as i64
    }
}

/// Insert or replace by id.
pub fn upsert_analysis(conn: &Connection, analysis: &Analysis) -> Result<(), StorageError> {
    let payload = serde_json::to_string(analysis)
        .map_err(|e| StorageError::Decode { message: e.to_string() })?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR REPLACE INTO analyses
             (id, pipeline_name, drift_score, risk_level, timestamp_ms,
              critical_issues, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(sqe)?;
    stmt.execute(params![
        analysis.id,
        analysis.pipeline_name,
        analysis.drift_score,
        analysis.risk_level.name(),
        analysis.timestamp.timestamp_millis(),
        analysis.critical_issue_count() as i64,
        payload,
    ])
    .map_err(sqe)?;
    Ok(())
}

/// Newest-first listing with optional pipeline/since filters.
pub fn query_analyses(
    conn: &Connection,
    query: &AnalysisQuery,
) -> Result<Vec<Analysis>, StorageError> {
    let mut sql = String::from("SELECT payload FROM analyses");
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(pipeline) = &query.pipeline {
        params.push(Box::new(pipeline.clone()));
        clauses.push(format!("pipeline_name = ?{}", params.len()));
    }
    if let Some(since) = &query.since {
        params.push(Box::new(since.timestamp_millis()));
        clauses.push(format!("timestamp_ms >= ?{}", params.len()));
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    params.push(Box::new(query.effective_limit()));
    // rowid breaks ties between analyses stored in the same millisecond.
    sql.push_str(&format!(
        " ORDER BY timestamp_ms DESC, rowid DESC LIMIT ?{}",
        params.len()
    ));

    let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            |row| row.get::<_, String>(0),
        )
        .map_err(sqe)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(decode(&row.map_err(sqe)?)?);
    }
    Ok(result)
}

/// Fetch one analysis by id.
pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Analysis>, StorageError> {
    let mut stmt = conn
        .prepare_cached("SELECT payload FROM analyses WHERE id = ?1")
        .map_err(sqe)?;
    let payload: Option<String> = stmt
        .query_row(params![id], |row| row.get(0))
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(sqe(other)),
        })?;
    payload.as_deref().map(decode).transpose()
}

/// Oldest stored analysis for a pipeline (the diff baseline side).
pub fn oldest_for_pipeline(
    conn: &Connection,
    pipeline: &str,
) -> Result<Option<Analysis>, StorageError> {
    bound_for_pipeline(conn, pipeline, "ASC")
}

/// Newest stored analysis for a pipeline (the diff current side).
pub fn newest_for_pipeline(
    conn: &Connection,
    pipeline: &str,
) -> Result<Option<Analysis>, StorageError> {
    bound_for_pipeline(conn, pipeline, "DESC")
}

fn bound_for_pipeline(
    conn: &Connection,
    pipeline: &str,
    order: &str,
) -> Result<Option<Analysis>, StorageError> {
    let sql = format!(
        "SELECT payload FROM analyses WHERE pipeline_name = ?1
         ORDER BY timestamp_ms {order}, rowid {order} LIMIT 1"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
    let payload: Option<String> = stmt
        .query_row(params![pipeline], |row| row.get(0))
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(sqe(other)),
        })?;
    payload.as_deref().map(decode).transpose()
}

/// Aggregate statistics, computed in SQL. `exclude_test_data` drops
/// pipelines named like test fixtures before aggregating.
pub fn rolling_stats(
    conn: &Connection,
    exclude_test_data: bool,
) -> Result<RollingStats, StorageError> {
    let sql = if exclude_test_data {
        format!(
            "SELECT COUNT(*), COALESCE(AVG(drift_score), 0),
                    COALESCE(SUM(critical_issues), 0), MAX(timestamp_ms)
             FROM analyses WHERE {NOT_TEST_DATA}"
        )
    } else {
        "SELECT COUNT(*), COALESCE(AVG(drift_score), 0),
                COALESCE(SUM(critical_issues), 0), MAX(timestamp_ms)
         FROM analyses"
            .to_string()
    };

    let mut stmt = conn.prepare_cached(&sql).map_err(sqe)?;
    let (total, average, critical, last_ms): (i64, f64, i64, Option<i64>) = stmt
        .query_row([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .map_err(sqe)?;

    Ok(RollingStats {
        total_analyses: total as u64,
        average_score: (average * 100.0).round() / 100.0,
        critical_issues: critical as u64,
        last_analysis: last_ms.and_then(DateTime::from_timestamp_millis),
    })
}

fn decode(payload: &str) -> Result<Analysis, StorageError> {
    serde_json::from_str(payload).map_err(|e| StorageError::Decode { message: e.to_string() })
}
