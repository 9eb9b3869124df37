//! `GET /history` — analyses, timeline, and quick-stat tiles.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use driftwatch_analysis::report;
use driftwatch_core::types::analysis::Analysis;
use driftwatch_core::types::report::{QuickStat, TimelinePoint};
use driftwatch_storage::queries::analyses::AnalysisQuery;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub pipeline: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub since: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub history: Vec<Analysis>,
    pub timeline: Vec<TimelinePoint>,
    pub stats: Vec<QuickStat>,
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<HistoryResponse>> {
    if let Some(limit) = params.limit {
        if !(1..=1000).contains(&limit) {
            return Err(ApiError::InvalidLimit { limit });
        }
    }
    let since = params
        .since
        .as_deref()
        .map(parse_since)
        .transpose()?;

    let list = state.store.query(&AnalysisQuery {
        pipeline: params.pipeline,
        limit: params.limit,
        since,
    })?;
    let timeline = report::timeline(&list);

    let stats = state.store.stats(state.config.is_production())?;
    let recent = state.store.recent(20)?;
    let tiles = report::quick_stats(&stats, &recent, Utc::now());

    Ok(Json(HistoryResponse { history: list, timeline, stats: tiles }))
}

fn parse_since(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::Validation {
            message: format!("since must be an RFC3339 timestamp, got {raw:?}"),
        })
}
