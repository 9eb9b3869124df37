//! End-to-end feature extraction from normalized vendor logs.

use serde_json::json;

use driftwatch_analysis::{features, normalizer};
use driftwatch_core::types::features::idx;

#[test]
fn github_log_extracts_expected_counts() {
    let doc = json!({
        "workflow": "ci",
        "jobs": [{"name": "pipeline", "steps": [
            {"name": "checkout", "permissions": {"contents": "read"}},
            {"name": "dependency scan"},
            {"name": "build", "permissions": {"packages": "write"}},
            {"name": "deploy", "type": "deploy", "env": {"DEPLOY_KEY": "x"}},
            {"name": "post-deploy audit"}
        ]}]
    });
    let run = normalizer::normalize(&doc).unwrap();
    let vector = features::extract(&run).unwrap();

    assert_eq!(vector.get(idx::TOTAL_STEP_COUNT), 5.0);
    // "dependency scan", "post-deploy audit", and — via the aggressive
    // "check" substring — "checkout" all count as security-related.
    assert_eq!(vector.get(idx::SECURITY_STEP_COUNT), 3.0);
    assert_eq!(vector.get(idx::SECURITY_SCAN_COUNT), 2.0);
    assert_eq!(vector.get(idx::READ_PERMISSION_COUNT), 1.0);
    assert_eq!(vector.get(idx::WRITE_PERMISSION_COUNT), 1.0);
    assert_eq!(vector.get(idx::ADMIN_PERMISSION_COUNT), 0.0);
    assert_eq!(vector.get(idx::SECRETS_USAGE_COUNT), 1.0);
    // Deploy is step 4; checkout (1) and the scan (2) precede it, the audit
    // (5) does not.
    assert_eq!(vector.get(idx::SECURITY_BEFORE_DEPLOY), 2.0);
    // read (1) → none (0) → write (2) is a strict increase.
    assert_eq!(vector.get(idx::PERMISSION_ESCALATION), 1.0);
    assert_eq!(vector.get(idx::SECURITY_STEP_RATIO), 3.0 / 5.0);
}

#[test]
fn empty_log_extracts_all_zeros() {
    let run = normalizer::normalize(&json!({"workflow": "ci", "jobs": []})).unwrap();
    let vector = features::extract(&run).unwrap();
    assert!(vector.values().iter().all(|v| *v == 0.0));
}
