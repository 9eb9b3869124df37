//! `POST /train` — fit (or merge into) a named baseline model.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use driftwatch_analysis::{baseline, features, normalizer};
use driftwatch_core::constants::{DEFAULT_MODEL_NAME, MIN_BASELINE_RUNS};
use driftwatch_core::types::features::{FeatureVector, FEATURE_COUNT};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    #[serde(default)]
    pub baseline_logs: Vec<Value>,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Merge into the existing model instead of replacing it.
    #[serde(default)]
    pub retrain: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainResponse {
    pub status: &'static str,
    pub model_name: String,
    pub trained_at: DateTime<Utc>,
    pub baseline_run_count: u64,
    pub features: usize,
    pub processed_logs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

pub async fn train(
    State(state): State<AppState>,
    Json(body): Json<TrainRequest>,
) -> ApiResult<Json<TrainResponse>> {
    let mut vectors: Vec<FeatureVector> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut pipeline_name: Option<String> = None;

    for (i, log) in body.baseline_logs.iter().enumerate() {
        match normalize_and_extract(log) {
            Ok((pipeline, vector)) => {
                pipeline_name.get_or_insert(pipeline);
                vectors.push(vector);
            }
            Err(reason) => errors.push(format!("log {}: {reason}", i + 1)),
        }
    }

    // The existing model stays untouched unless we have enough valid runs.
    if vectors.len() < MIN_BASELINE_RUNS {
        return Err(ApiError::Training { valid: vectors.len(), errors });
    }

    let name = body
        .model_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_MODEL_NAME);

    let model = if body.retrain && state.models.exists(name) {
        let previous = state.models.get(name)?;
        baseline::retrain(&previous, &vectors)?
    } else {
        let pipeline = pipeline_name.as_deref().unwrap_or(name);
        baseline::train(&vectors, pipeline)?
    };
    let stored = state.models.put(name, model)?;

    tracing::info!(
        model = name,
        runs = stored.baseline_run_count,
        rejected = errors.len(),
        "baseline trained"
    );

    Ok(Json(TrainResponse {
        status: "trained",
        model_name: name.to_string(),
        trained_at: stored.trained_at,
        baseline_run_count: stored.baseline_run_count,
        features: FEATURE_COUNT,
        processed_logs: body.baseline_logs.len(),
        errors: (!errors.is_empty()).then_some(errors),
    }))
}

fn normalize_and_extract(log: &Value) -> Result<(String, FeatureVector), String> {
    let run = normalizer::normalize(log).map_err(|e| e.to_string())?;
    let vector = features::extract(&run).map_err(|e| e.to_string())?;
    Ok((run.pipeline, vector))
}
