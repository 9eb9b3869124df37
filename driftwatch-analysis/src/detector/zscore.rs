//! The default scorer: weighted aggregation of per-feature |z|.

use async_trait::async_trait;

use driftwatch_core::errors::detect_error::DetectError;
use driftwatch_core::types::analysis::RiskLevel;
use driftwatch_core::types::features::FeatureVector;
use driftwatch_core::types::model::BaselineModel;

use super::deviation::{feature_deviations, round2};
use super::weights::{total_weight, FEATURE_WEIGHTS};
use super::{DriftScorer, ScoreOutcome};

/// Explainable statistical scorer over the trained per-feature μ/σ.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZScoreScorer;

impl ZScoreScorer {
    pub fn new() -> Self {
        Self
    }

    /// The synchronous core: weighted |z| aggregation, clipped to [0,100]
    /// and rounded to two decimals.
    pub fn evaluate(&self, vector: &FeatureVector, model: &BaselineModel) -> ScoreOutcome {
        let deviations = feature_deviations(vector, model);
        let weighted: f64 = deviations
            .iter()
            .map(|d| d.z.abs() * FEATURE_WEIGHTS[d.index])
            .sum();
        let raw = 20.0 * weighted / total_weight();
        let drift_score = round2(raw.clamp(0.0, 100.0));
        ScoreOutcome {
            drift_score,
            risk_level: RiskLevel::from_score(drift_score),
            anomaly_score: None,
            is_anomaly: None,
        }
    }
}

#[async_trait]
impl DriftScorer for ZScoreScorer {
    fn name(&self) -> &'static str {
        "statistical-zscore"
    }

    async fn score(
        &self,
        vector: &FeatureVector,
        model: &BaselineModel,
    ) -> Result<ScoreOutcome, DetectError> {
        Ok(self.evaluate(vector, model))
    }
}
