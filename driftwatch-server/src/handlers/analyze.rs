//! `POST /analyze` — ingest one pipeline log, return the scored analysis.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use driftwatch_analysis::{features, normalizer, report};
use driftwatch_core::constants::DEFAULT_MODEL_NAME;
use driftwatch_core::types::analysis::Analysis;
use driftwatch_core::types::report::Trend;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub pipeline: Option<String>,
    /// The raw log: any JSON document, or a string containing one.
    #[serde(default)]
    pub log: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// The stored analysis plus its trend against the previous run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub trend: Option<Trend>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let log = body.log.ok_or(ApiError::MissingLog)?;
    let response = run_analysis(
        &state,
        &log,
        body.pipeline.as_deref(),
        body.timestamp.as_deref(),
        body.model_name.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

/// The full analyze flow: normalize → gate → extract → detect → persist →
/// trend. Shared with `POST /pipeline-logs/:filename/process`.
pub(crate) async fn run_analysis(
    state: &AppState,
    log: &Value,
    pipeline_override: Option<&str>,
    timestamp_override: Option<&str>,
    model_name: Option<&str>,
) -> ApiResult<AnalyzeResponse> {
    let mut run = normalizer::normalize(log)?;
    if let Some(name) = pipeline_override.filter(|n| !n.trim().is_empty()) {
        run.pipeline = name.to_string();
    }
    if let Some(raw) = timestamp_override {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            run.timestamp = parsed.with_timezone(&Utc);
        }
    }

    // Production safety: refuse test data before any model work or writes.
    if state.rejects_as_test_data(&run.pipeline) {
        return Err(ApiError::ProductionGuard { pipeline: run.pipeline });
    }

    let vector = features::extract(&run)?;
    let model = state.models.get(model_name.unwrap_or(DEFAULT_MODEL_NAME))?;
    let analysis = state
        .detector
        .detect(&vector, &run.steps, &model, &run.pipeline)
        .await?;

    // Durability is best-effort: a storage failure is logged, the caller
    // still receives the computed analysis.
    if let Err(e) = state.store.upsert(&analysis) {
        tracing::warn!(error = %e, id = %analysis.id, "analysis not persisted");
    }

    let trend = state
        .store
        .get_by_pipeline(&analysis.pipeline_name, 50)
        .map(|history| report::trend(&analysis, &history))
        .unwrap_or(None);

    Ok(AnalyzeResponse { analysis, trend })
}
