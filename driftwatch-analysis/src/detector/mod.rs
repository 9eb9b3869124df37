//! Drift detection: pluggable scoring plus the issue/explanation layer.
//!
//! Two strategies satisfy [`DriftScorer`]: the explainable weighted z-score
//! scorer (default) and an external HTTP anomaly scorer. Issue emission is a
//! separate concern applied after either one, so both modes produce the same
//! issue taxonomy.

pub mod deviation;
pub mod issues;
pub mod remote;
pub mod weights;
pub mod zscore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use driftwatch_core::errors::detect_error::DetectError;
use driftwatch_core::types::analysis::{Analysis, RiskLevel};
use driftwatch_core::types::features::FeatureVector;
use driftwatch_core::types::model::BaselineModel;
use driftwatch_core::types::run::PipelineStep;

pub use deviation::{feature_deviations, FeatureDeviation, MagnitudeTier};
pub use remote::RemoteScorer;
pub use zscore::ZScoreScorer;

/// What a scorer produces. Risk is always recomputed from the (clipped)
/// score so the score→risk invariant holds in both modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOutcome {
    pub drift_score: f64,
    pub risk_level: RiskLevel,
    pub anomaly_score: Option<f64>,
    pub is_anomaly: Option<bool>,
}

/// A drift-scoring strategy.
#[async_trait]
pub trait DriftScorer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn score(
        &self,
        vector: &FeatureVector,
        model: &BaselineModel,
    ) -> Result<ScoreOutcome, DetectError>;
}

/// The detector: validates inputs, runs the configured scorer, then derives
/// issues and explanations from the per-feature deviations.
pub struct DriftDetector {
    scorer: Arc<dyn DriftScorer>,
}

impl DriftDetector {
    /// The default, fully local statistical detector.
    pub fn statistical() -> Self {
        Self { scorer: Arc::new(ZScoreScorer::new()) }
    }

    /// Detector backed by an external anomaly scorer.
    pub fn remote(url: String, timeout_ms: u64, retries: u32) -> Result<Self, DetectError> {
        Ok(Self { scorer: Arc::new(RemoteScorer::new(url, timeout_ms, retries)?) })
    }

    pub fn with_scorer(scorer: Arc<dyn DriftScorer>) -> Self {
        Self { scorer }
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Run detection. Deterministic for a given (vector, model) pair apart
    /// from the generated `id` and `timestamp`. Performs no persistence.
    pub async fn detect(
        &self,
        vector: &FeatureVector,
        steps: &[PipelineStep],
        model: &BaselineModel,
        pipeline_name: &str,
    ) -> Result<Analysis, DetectError> {
        vector.validate().map_err(DetectError::InvalidVector)?;
        model.validate().map_err(DetectError::Model)?;

        let outcome = self.scorer.score(vector, model).await?;
        let deviations = deviation::feature_deviations(vector, model);
        let issues = issues::derive_issues(&deviations);
        let explanations = issues::derive_explanations(&deviations);

        tracing::debug!(
            pipeline = pipeline_name,
            scorer = self.scorer.name(),
            score = outcome.drift_score,
            risk = outcome.risk_level.name(),
            issues = issues.len(),
            "drift detection complete"
        );

        Ok(Analysis {
            id: Uuid::new_v4().to_string(),
            pipeline_name: pipeline_name.to_string(),
            drift_score: outcome.drift_score,
            risk_level: outcome.risk_level,
            timestamp: Utc::now(),
            issues,
            explanations,
            feature_vector: vector.clone(),
            parsed_steps: steps.to_vec(),
            anomaly_score: outcome.anomaly_score,
            is_anomaly: outcome.is_anomaly,
        })
    }
}
