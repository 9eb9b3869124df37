//! `/pipeline-logs` — list, fetch, and re-process stored log files.
//!
//! Filenames are confined to `pipeline-log-*.json` inside the configured
//! directory; anything else is rejected before touching the filesystem.

use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use driftwatch_core::errors::normalize_error::NormalizeError;

use crate::error::{ApiError, ApiResult};
use crate::handlers::analyze::{run_analysis, AnalyzeResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListResponse {
    pub logs: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFileResponse {
    pub filename: String,
    pub data: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub status: &'static str,
    pub message: String,
    pub analysis: AnalyzeResponse,
}

pub async fn list_logs(State(state): State<AppState>) -> ApiResult<Json<LogListResponse>> {
    let dir = state.config.effective_logs_dir();
    let mut logs = Vec::new();
    if let Ok(entries) = std::fs::read_dir(&dir) {
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                if is_valid_filename(name) {
                    logs.push(name.to_string());
                }
            }
        }
    }
    logs.sort();
    let count = logs.len();
    Ok(Json(LogListResponse { logs, count }))
}

pub async fn fetch_log(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<LogFileResponse>> {
    let data = read_log(&state, &filename)?;
    Ok(Json(LogFileResponse { filename, data }))
}

pub async fn process_log(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<ProcessResponse>> {
    let data = read_log(&state, &filename)?;
    let analysis = run_analysis(&state, &data, None, None, None).await?;
    Ok(Json(ProcessResponse {
        status: "processed",
        message: format!("re-analyzed {filename}"),
        analysis,
    }))
}

fn read_log(state: &AppState, filename: &str) -> Result<Value, ApiError> {
    if !is_valid_filename(filename) {
        return Err(ApiError::InvalidFilename);
    }
    let path: PathBuf = state.config.effective_logs_dir().join(filename);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound { resource: format!("log file {filename:?}") })
        }
        Err(e) => {
            return Err(ApiError::Validation { message: format!("cannot read {filename:?}: {e}") })
        }
    };
    serde_json::from_str(&text).map_err(|e| {
        ApiError::Parse(NormalizeError::InvalidJson { message: e.to_string() })
    })
}

/// `pipeline-log-*.json`, a single path segment, no traversal.
fn is_valid_filename(name: &str) -> bool {
    name.starts_with("pipeline-log-")
        && name.ends_with(".json")
        && name.len() >= "pipeline-log-.json".len()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_validation() {
        assert!(is_valid_filename("pipeline-log-2026-03-01.json"));
        assert!(is_valid_filename("pipeline-log-x.json"));
        assert!(!is_valid_filename("other.json"));
        assert!(!is_valid_filename("pipeline-log-x.txt"));
        assert!(!is_valid_filename("pipeline-log-../secret.json"));
        assert!(!is_valid_filename("../pipeline-log-x.json"));
        assert!(!is_valid_filename("pipeline-log-a/b.json"));
    }
}
