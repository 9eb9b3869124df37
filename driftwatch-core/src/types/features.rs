//! The frozen 17-dimension feature vector.
//!
//! The index → semantic mapping is part of the persisted model's
//! compatibility contract. Changing the order or the set is a breaking
//! model-format bump and requires retraining.

use serde::{Deserialize, Serialize};

use crate::errors::feature_error::FeatureError;

/// Number of features in the vector. Frozen.
pub const FEATURE_COUNT: usize = 17;

/// Feature names in index order. Frozen; these strings key the model file.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "securityScanCount",
    "securityStepCount",
    "readPermissionCount",
    "writePermissionCount",
    "adminPermissionCount",
    "secretsUsageCount",
    "approvalStepCount",
    "avgSecurityStepOrder",
    "permissionEscalation",
    "totalStepCount",
    "securityStepRatio",
    "normalizedFirstSecurityStep",
    "normalizedLastSecurityStep",
    "secretsWithWriteCount",
    "stepsWithAdminCount",
    "securityBeforeDeploy",
    "normalizedAvgStepOrder",
];

/// Named indexes into the vector.
pub mod idx {
    pub const SECURITY_SCAN_COUNT: usize = 0;
    pub const SECURITY_STEP_COUNT: usize = 1;
    pub const READ_PERMISSION_COUNT: usize = 2;
    pub const WRITE_PERMISSION_COUNT: usize = 3;
    pub const ADMIN_PERMISSION_COUNT: usize = 4;
    pub const SECRETS_USAGE_COUNT: usize = 5;
    pub const APPROVAL_STEP_COUNT: usize = 6;
    pub const AVG_SECURITY_STEP_ORDER: usize = 7;
    pub const PERMISSION_ESCALATION: usize = 8;
    pub const TOTAL_STEP_COUNT: usize = 9;
    pub const SECURITY_STEP_RATIO: usize = 10;
    pub const NORMALIZED_FIRST_SECURITY_STEP: usize = 11;
    pub const NORMALIZED_LAST_SECURITY_STEP: usize = 12;
    pub const SECRETS_WITH_WRITE_COUNT: usize = 13;
    pub const STEPS_WITH_ADMIN_COUNT: usize = 14;
    pub const SECURITY_BEFORE_DEPLOY: usize = 15;
    pub const NORMALIZED_AVG_STEP_ORDER: usize = 16;
}

/// An ordered 17-tuple of finite reals extracted from a canonical run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap a raw array. Callers are expected to `validate()` vectors that
    /// cross a trust boundary (deserialized input, remote scorers).
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// The all-zero vector (what an empty run extracts to).
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    /// Build from a slice, rejecting wrong lengths and non-finite entries.
    pub fn from_slice(values: &[f64]) -> Result<Self, FeatureError> {
        if values.len() != FEATURE_COUNT {
            return Err(FeatureError::WrongLength {
                expected: FEATURE_COUNT,
                found: values.len(),
            });
        }
        let mut out = [0.0; FEATURE_COUNT];
        out.copy_from_slice(values);
        let vector = Self(out);
        vector.validate()?;
        Ok(vector)
    }

    /// Reject non-finite entries.
    pub fn validate(&self) -> Result<(), FeatureError> {
        for (i, &value) in self.0.iter().enumerate() {
            if !value.is_finite() {
                return Err(FeatureError::NonFinite {
                    feature: FEATURE_NAMES[i],
                    value,
                });
            }
        }
        Ok(())
    }

    /// Value at the given index. Panics on out-of-range (indexes come from
    /// the frozen `idx` module, never from input).
    pub fn get(&self, index: usize) -> f64 {
        self.0[index]
    }

    /// The raw values in index order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Iterate `(name, value)` pairs in index order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_indexes_line_up() {
        assert_eq!(FEATURE_NAMES[idx::PERMISSION_ESCALATION], "permissionEscalation");
        assert_eq!(FEATURE_NAMES[idx::NORMALIZED_AVG_STEP_ORDER], "normalizedAvgStepOrder");
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = FeatureVector::from_slice(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FeatureError::WrongLength { found: 2, .. }));
    }

    #[test]
    fn from_slice_rejects_nan() {
        let mut values = [0.0; FEATURE_COUNT];
        values[3] = f64::NAN;
        let err = FeatureVector::from_slice(&values).unwrap_err();
        assert!(matches!(err, FeatureError::NonFinite { feature: "writePermissionCount", .. }));
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(FeatureVector::zeros()).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), FEATURE_COUNT);
    }
}
