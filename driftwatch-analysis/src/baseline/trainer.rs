//! Baseline training: per-feature mean, population σ, count, min, max.

use std::collections::BTreeMap;

use chrono::Utc;
use statrs::statistics::Statistics;

use driftwatch_core::constants::STD_DEV_FLOOR;
use driftwatch_core::errors::model_error::ModelError;
use driftwatch_core::types::features::{FeatureVector, FEATURE_NAMES};
use driftwatch_core::types::model::{BaselineModel, FeatureStats, MODEL_FORMAT_VERSION};

/// Fit a fresh model from baseline feature vectors.
///
/// A single sample or zero variance leaves σ at the floor so later z-scores
/// stay finite.
pub fn train(vectors: &[FeatureVector], pipeline_name: &str) -> Result<BaselineModel, ModelError> {
    if vectors.is_empty() {
        return Err(ModelError::InsufficientTraining { required: 1, valid: 0 });
    }

    let mut features = BTreeMap::new();
    for (i, name) in FEATURE_NAMES.iter().enumerate() {
        let samples: Vec<f64> = vectors.iter().map(|v| v.get(i)).collect();
        features.insert(name.to_string(), fit_feature(&samples));
    }

    Ok(BaselineModel {
        features,
        trained_at: Utc::now(),
        baseline_run_count: vectors.len() as u64,
        pipeline_name: pipeline_name.to_string(),
        version: MODEL_FORMAT_VERSION,
    })
}

/// Merge new baseline vectors into an existing model.
///
/// Raw samples are not retained, so the combined σ is the pooled
/// approximation √((σ₁²n₁ + σ₂²n₂) / (n₁+n₂)) — it ignores the shift
/// between batch means, which is acceptable for drift thresholds.
pub fn retrain(
    old: &BaselineModel,
    vectors: &[FeatureVector],
) -> Result<BaselineModel, ModelError> {
    old.validate()?;
    if vectors.is_empty() {
        return Err(ModelError::InsufficientTraining { required: 1, valid: 0 });
    }

    let n_new = vectors.len() as u64;
    let mut features = BTreeMap::new();
    for (i, name) in FEATURE_NAMES.iter().enumerate() {
        let samples: Vec<f64> = vectors.iter().map(|v| v.get(i)).collect();
        let fresh = fit_feature(&samples);
        let merged = match old.features.get(*name) {
            Some(prior) => pool_stats(prior, &fresh),
            // A feature the old model never saw is initialized from the new
            // data alone.
            None => fresh,
        };
        features.insert(name.to_string(), merged);
    }

    Ok(BaselineModel {
        features,
        trained_at: Utc::now(),
        baseline_run_count: old.baseline_run_count + n_new,
        pipeline_name: old.pipeline_name.clone(),
        version: MODEL_FORMAT_VERSION,
    })
}

fn fit_feature(samples: &[f64]) -> FeatureStats {
    let mean = Statistics::mean(samples);
    let std_dev = Statistics::population_std_dev(samples).max(STD_DEV_FLOOR);
    FeatureStats {
        mean,
        std_dev,
        count: samples.len() as u64,
        min: Statistics::min(samples),
        max: Statistics::max(samples),
    }
}

fn pool_stats(old: &FeatureStats, new: &FeatureStats) -> FeatureStats {
    let n_old = old.count as f64;
    let n_new = new.count as f64;
    let total = n_old + n_new;
    let mean = (old.mean * n_old + new.mean * n_new) / total;
    let pooled_variance =
        (old.std_dev.powi(2) * n_old + new.std_dev.powi(2) * n_new) / total;
    FeatureStats {
        mean,
        std_dev: pooled_variance.sqrt().max(STD_DEV_FLOOR),
        count: old.count + new.count,
        min: old.min.min(new.min),
        max: old.max.max(new.max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_core::types::features::{idx, FEATURE_COUNT};

    fn vector_with(index: usize, value: f64) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        values[index] = value;
        FeatureVector::new(values)
    }

    #[test]
    fn train_requires_at_least_one_vector() {
        assert!(matches!(
            train(&[], "ci"),
            Err(ModelError::InsufficientTraining { valid: 0, .. })
        ));
    }

    #[test]
    fn constant_feature_gets_floored_sigma() {
        let vectors = vec![
            vector_with(idx::TOTAL_STEP_COUNT, 5.0),
            vector_with(idx::TOTAL_STEP_COUNT, 5.0),
            vector_with(idx::TOTAL_STEP_COUNT, 5.0),
        ];
        let model = train(&vectors, "ci").unwrap();
        let stats = model.stats("totalStepCount").unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, STD_DEV_FLOOR);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn population_std_dev_is_used() {
        let vectors = vec![
            vector_with(idx::TOTAL_STEP_COUNT, 2.0),
            vector_with(idx::TOTAL_STEP_COUNT, 4.0),
        ];
        let model = train(&vectors, "ci").unwrap();
        let stats = model.stats("totalStepCount").unwrap();
        // Population σ of {2, 4} is 1, not √2.
        assert!((stats.std_dev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn trained_model_validates() {
        let model = train(&[FeatureVector::zeros()], "ci").unwrap();
        assert!(model.validate().is_ok());
        assert_eq!(model.baseline_run_count, 1);
    }

    #[test]
    fn retrain_pools_counts_and_means() {
        let old = train(
            &[vector_with(idx::TOTAL_STEP_COUNT, 2.0), vector_with(idx::TOTAL_STEP_COUNT, 2.0)],
            "ci",
        )
        .unwrap();
        let merged = retrain(&old, &[vector_with(idx::TOTAL_STEP_COUNT, 8.0)]).unwrap();
        let stats = merged.stats("totalStepCount").unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 4.0).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 8.0);
        assert_eq!(merged.baseline_run_count, 3);
    }
}
