//! The persisted baseline model: per-feature statistics plus metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::model_error::ModelError;
use crate::types::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Bumped whenever the feature set or order changes. Loading a model with a
/// different version is refused — retrain instead.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Statistics for one feature across the baseline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStats {
    pub mean: f64,
    pub std_dev: f64,
    pub count: u64,
    pub min: f64,
    pub max: f64,
}

/// A trained baseline: per-feature mean/σ/count/min/max plus provenance.
///
/// `features` is a BTreeMap so serialization is canonical — persist, load,
/// re-persist is byte-stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineModel {
    pub features: BTreeMap<String, FeatureStats>,
    pub trained_at: DateTime<Utc>,
    pub baseline_run_count: u64,
    pub pipeline_name: String,
    pub version: u32,
}

impl BaselineModel {
    /// Reject models whose feature-name set is not exactly the frozen 17,
    /// whose σ is negative anywhere, or whose format version mismatches.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::FormatVersion {
                expected: MODEL_FORMAT_VERSION,
                found: self.version,
            });
        }
        for name in FEATURE_NAMES {
            match self.features.get(name) {
                None => {
                    return Err(ModelError::FeatureSet {
                        detail: format!("missing feature {name:?}"),
                    })
                }
                Some(stats) if stats.std_dev < 0.0 => {
                    return Err(ModelError::NegativeStdDev {
                        feature: name.to_string(),
                        std_dev: stats.std_dev,
                    })
                }
                Some(_) => {}
            }
        }
        if self.features.len() != FEATURE_COUNT {
            let unexpected: Vec<&str> = self
                .features
                .keys()
                .filter(|k| !FEATURE_NAMES.contains(&k.as_str()))
                .map(String::as_str)
                .collect();
            return Err(ModelError::FeatureSet {
                detail: format!("unexpected features {unexpected:?}"),
            });
        }
        Ok(())
    }

    /// Statistics for a feature by its frozen name.
    pub fn stats(&self, name: &str) -> Option<&FeatureStats> {
        self.features.get(name)
    }

    /// The per-feature means as a vector, in frozen index order.
    /// Only valid on a validated model.
    pub fn mean_vector(&self) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            if let Some(stats) = self.features.get(*name) {
                values[i] = stats.mean;
            }
        }
        FeatureVector::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_all_features() -> BaselineModel {
        let features = FEATURE_NAMES
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    FeatureStats { mean: 1.0, std_dev: 0.5, count: 3, min: 0.0, max: 2.0 },
                )
            })
            .collect();
        BaselineModel {
            features,
            trained_at: Utc::now(),
            baseline_run_count: 3,
            pipeline_name: "ci".to_string(),
            version: MODEL_FORMAT_VERSION,
        }
    }

    #[test]
    fn validates_complete_model() {
        assert!(model_with_all_features().validate().is_ok());
    }

    #[test]
    fn rejects_missing_feature() {
        let mut model = model_with_all_features();
        model.features.remove("secretsUsageCount");
        assert!(matches!(model.validate(), Err(ModelError::FeatureSet { .. })));
    }

    #[test]
    fn rejects_unknown_feature() {
        let mut model = model_with_all_features();
        model.features.insert(
            "bogusFeature".to_string(),
            FeatureStats { mean: 0.0, std_dev: 0.1, count: 1, min: 0.0, max: 0.0 },
        );
        assert!(matches!(model.validate(), Err(ModelError::FeatureSet { .. })));
    }

    #[test]
    fn rejects_negative_std_dev() {
        let mut model = model_with_all_features();
        model.features.get_mut("totalStepCount").unwrap().std_dev = -0.2;
        assert!(matches!(model.validate(), Err(ModelError::NegativeStdDev { .. })));
    }

    #[test]
    fn rejects_version_mismatch() {
        let mut model = model_with_all_features();
        model.version = MODEL_FORMAT_VERSION + 1;
        assert!(matches!(model.validate(), Err(ModelError::FormatVersion { .. })));
    }
}
