//! Per-feature aggregation weights, in frozen index order.
//!
//! Weights encode semantic importance: permission and secrets drift weigh
//! far more than raw step-count churn. Fixed constants — tuning them shifts
//! every score, so they change together with the model format, not ad hoc.

use driftwatch_core::types::features::FEATURE_COUNT;

pub const FEATURE_WEIGHTS: [f64; FEATURE_COUNT] = [
    1.5, // securityScanCount
    1.4, // securityStepCount
    0.8, // readPermissionCount
    1.2, // writePermissionCount
    2.0, // adminPermissionCount
    1.8, // secretsUsageCount
    1.3, // approvalStepCount
    1.0, // avgSecurityStepOrder
    2.5, // permissionEscalation
    0.5, // totalStepCount
    1.6, // securityStepRatio
    1.1, // normalizedFirstSecurityStep
    1.1, // normalizedLastSecurityStep
    2.2, // secretsWithWriteCount
    2.0, // stepsWithAdminCount
    1.7, // securityBeforeDeploy
    0.9, // normalizedAvgStepOrder
];

/// Sum of all weights — the aggregate-score denominator.
pub fn total_weight() -> f64 {
    FEATURE_WEIGHTS.iter().sum()
}
