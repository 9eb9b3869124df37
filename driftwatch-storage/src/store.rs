//! `AnalysisStore` — the storage engine the handlers talk to.
//!
//! Wraps `DatabaseManager`; all access goes through `with_conn`. Analyses
//! are append-only: upserted once by id, never mutated.

use std::path::Path;

use chrono::{DateTime, Utc};

use driftwatch_core::errors::storage_error::StorageError;
use driftwatch_core::types::analysis::Analysis;
use driftwatch_core::types::report::RollingStats;

use crate::connection::DatabaseManager;
use crate::queries::analyses::{self, AnalysisQuery};

pub struct AnalysisStore {
    db: DatabaseManager,
}

impl AnalysisStore {
    /// Open a file-backed store, running migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self { db: DatabaseManager::open(path)? })
    }

    /// In-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self { db: DatabaseManager::open_in_memory()? })
    }

    pub fn path(&self) -> Option<&Path> {
        self.db.path()
    }

    /// Insert or replace an analysis, keyed by id.
    pub fn upsert(&self, analysis: &Analysis) -> Result<(), StorageError> {
        self.db.with_conn(|conn| analyses::upsert_analysis(conn, analysis))
    }

    /// Newest-first history with optional pipeline/since filters.
    pub fn query(&self, query: &AnalysisQuery) -> Result<Vec<Analysis>, StorageError> {
        self.db.with_conn(|conn| analyses::query_analyses(conn, query))
    }

    /// Newest-first history for one pipeline.
    pub fn get_by_pipeline(
        &self,
        pipeline: &str,
        limit: usize,
    ) -> Result<Vec<Analysis>, StorageError> {
        let query = AnalysisQuery {
            pipeline: Some(pipeline.to_string()),
            limit: Some(limit),
            since: None,
        };
        self.query(&query)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Analysis>, StorageError> {
        self.db.with_conn(|conn| analyses::get_by_id(conn, id))
    }

    /// Oldest and newest analyses for a pipeline — the two ends a diff
    /// compares. `None` when the pipeline has no analyses.
    pub fn pipeline_bounds(
        &self,
        pipeline: &str,
    ) -> Result<Option<(Analysis, Analysis)>, StorageError> {
        self.db.with_conn(|conn| {
            let oldest = analyses::oldest_for_pipeline(conn, pipeline)?;
            let newest = analyses::newest_for_pipeline(conn, pipeline)?;
            Ok(oldest.zip(newest))
        })
    }

    /// SQL-side rolling statistics.
    pub fn stats(&self, exclude_test_data: bool) -> Result<RollingStats, StorageError> {
        self.db.with_conn(|conn| analyses::rolling_stats(conn, exclude_test_data))
    }

    /// The most recent analyses across all pipelines (for tile deltas).
    pub fn recent(&self, limit: usize) -> Result<Vec<Analysis>, StorageError> {
        self.query(&AnalysisQuery { pipeline: None, limit: Some(limit), since: None })
    }

    /// Analyses stored since a point in time.
    pub fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Analysis>, StorageError> {
        self.query(&AnalysisQuery { pipeline: None, limit: Some(1000), since: Some(cutoff) })
    }
}
