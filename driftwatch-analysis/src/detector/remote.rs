//! External anomaly-scorer strategy.
//!
//! Posts the feature vector to a configured HTTP endpoint and adopts its
//! score. Transient failures retry with doubling backoff up to the
//! configured attempt count; exhaustion is an error — there is no silent
//! fallback to the statistical scorer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use driftwatch_core::errors::detect_error::DetectError;
use driftwatch_core::types::analysis::RiskLevel;
use driftwatch_core::types::features::FeatureVector;
use driftwatch_core::types::model::BaselineModel;

use super::deviation::round2;
use super::{DriftScorer, ScoreOutcome};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

pub struct RemoteScorer {
    client: reqwest::Client,
    url: String,
    attempts: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRequest<'a> {
    features: &'a [f64],
    pipeline_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    score: f64,
    #[serde(default)]
    anomaly_score: Option<f64>,
    #[serde(default)]
    is_anomaly: Option<bool>,
}

impl RemoteScorer {
    pub fn new(url: String, timeout_ms: u64, retries: u32) -> Result<Self, DetectError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| DetectError::ScorerUnreachable {
                attempts: 0,
                message: format!("client construction failed: {e}"),
            })?;
        Ok(Self { client, url, attempts: retries.max(1) })
    }

    async fn request_once(
        &self,
        vector: &FeatureVector,
        model: &BaselineModel,
    ) -> Result<ScoreResponse, RequestFailure> {
        let body = ScoreRequest {
            features: vector.values(),
            pipeline_name: &model.pipeline_name,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RequestFailure::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::Transient(format!("HTTP {status}")));
        }
        // A malformed body is not transient — fail without burning retries.
        response
            .json::<ScoreResponse>()
            .await
            .map_err(|e| RequestFailure::Fatal(e.to_string()))
    }
}

enum RequestFailure {
    Transient(String),
    Fatal(String),
}

#[async_trait]
impl DriftScorer for RemoteScorer {
    fn name(&self) -> &'static str {
        "remote-anomaly"
    }

    async fn score(
        &self,
        vector: &FeatureVector,
        model: &BaselineModel,
    ) -> Result<ScoreOutcome, DetectError> {
        let mut backoff = INITIAL_BACKOFF;
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            match self.request_once(vector, model).await {
                Ok(response) => {
                    if !response.score.is_finite() {
                        return Err(DetectError::ScorerResponse {
                            message: format!("non-finite score {}", response.score),
                        });
                    }
                    let drift_score = round2(response.score.clamp(0.0, 100.0));
                    return Ok(ScoreOutcome {
                        drift_score,
                        risk_level: RiskLevel::from_score(drift_score),
                        anomaly_score: response.anomaly_score,
                        is_anomaly: response.is_anomaly,
                    });
                }
                Err(RequestFailure::Fatal(message)) => {
                    return Err(DetectError::ScorerResponse { message });
                }
                Err(RequestFailure::Transient(message)) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.attempts,
                        error = %message,
                        "external scorer attempt failed"
                    );
                    last_error = message;
                    if attempt < self.attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        Err(DetectError::ScorerUnreachable {
            attempts: self.attempts,
            message: last_error,
        })
    }
}
