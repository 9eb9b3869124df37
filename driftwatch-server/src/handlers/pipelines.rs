//! `GET /pipelines/:name` — baseline-vs-current step diff for a pipeline.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwatch_analysis::diff;
use driftwatch_core::types::diff::DiffStep;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDiffResponse {
    pub pipeline_name: String,
    pub baseline: Vec<DiffStep>,
    pub current: Vec<DiffStep>,
    pub baseline_timestamp: DateTime<Utc>,
    pub current_timestamp: DateTime<Utc>,
}

pub async fn pipeline_diff(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<PipelineDiffResponse>> {
    let (oldest, newest) = state
        .store
        .pipeline_bounds(&name)?
        .ok_or_else(|| ApiError::NotFound {
            resource: format!("analyses for pipeline {name:?}"),
        })?;

    let result = diff::diff(&oldest.parsed_steps, &newest.parsed_steps);
    Ok(Json(PipelineDiffResponse {
        pipeline_name: name,
        baseline: result.baseline,
        current: result.current,
        baseline_timestamp: oldest.timestamp,
        current_timestamp: newest.timestamp,
    }))
}
