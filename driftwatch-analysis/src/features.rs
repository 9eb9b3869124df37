//! Feature extraction: canonical run → frozen 17-feature vector.
//!
//! Counts and ratios are guarded so every entry is finite; an empty run
//! extracts to all zeros.

use driftwatch_core::errors::feature_error::FeatureError;
use driftwatch_core::types::features::{idx, FeatureVector, FEATURE_COUNT};
use driftwatch_core::types::run::{PipelineRun, PipelineStep, StepType};

/// Extract the feature vector from a canonical run.
pub fn extract(run: &PipelineRun) -> Result<FeatureVector, FeatureError> {
    let steps = &run.steps;
    let mut values = [0.0_f64; FEATURE_COUNT];

    let total = steps.len() as f64;
    let security_steps: Vec<&PipelineStep> = steps.iter().filter(|s| s.security).collect();

    values[idx::SECURITY_SCAN_COUNT] = security_steps
        .iter()
        .filter(|s| {
            let name = s.name.to_lowercase();
            name.contains("scan") || name.contains("check")
        })
        .count() as f64;
    values[idx::SECURITY_STEP_COUNT] = security_steps.len() as f64;

    values[idx::READ_PERMISSION_COUNT] = count_permission(steps, "read");
    values[idx::WRITE_PERMISSION_COUNT] = count_permission(steps, "write");
    values[idx::ADMIN_PERMISSION_COUNT] = count_permission(steps, "admin");

    values[idx::SECRETS_USAGE_COUNT] = steps.iter().filter(|s| s.secrets).count() as f64;
    values[idx::APPROVAL_STEP_COUNT] = steps.iter().filter(|s| s.approval).count() as f64;

    values[idx::AVG_SECURITY_STEP_ORDER] = if security_steps.is_empty() {
        0.0
    } else {
        security_steps.iter().map(|s| s.execution_order as f64).sum::<f64>()
            / security_steps.len() as f64
    };

    values[idx::PERMISSION_ESCALATION] = if has_permission_escalation(steps) { 1.0 } else { 0.0 };

    values[idx::TOTAL_STEP_COUNT] = total;
    values[idx::SECURITY_STEP_RATIO] = if steps.is_empty() {
        0.0
    } else {
        security_steps.len() as f64 / total
    };

    if !security_steps.is_empty() {
        let first = security_steps.iter().map(|s| s.execution_order).min().unwrap_or(0);
        let last = security_steps.iter().map(|s| s.execution_order).max().unwrap_or(0);
        values[idx::NORMALIZED_FIRST_SECURITY_STEP] = first as f64 / total;
        values[idx::NORMALIZED_LAST_SECURITY_STEP] = last as f64 / total;
    }

    values[idx::SECRETS_WITH_WRITE_COUNT] = steps
        .iter()
        .filter(|s| s.secrets && s.has_permission("write"))
        .count() as f64;
    values[idx::STEPS_WITH_ADMIN_COUNT] = values[idx::ADMIN_PERMISSION_COUNT];

    values[idx::SECURITY_BEFORE_DEPLOY] = security_before_deploy(steps, &security_steps);

    values[idx::NORMALIZED_AVG_STEP_ORDER] = if steps.is_empty() {
        0.0
    } else {
        let avg = steps.iter().map(|s| s.execution_order as f64).sum::<f64>() / total;
        avg / total
    };

    let vector = FeatureVector::new(values);
    vector.validate()?;
    Ok(vector)
}

fn count_permission(steps: &[PipelineStep], token: &str) -> f64 {
    steps.iter().filter(|s| s.has_permission(token)).count() as f64
}

/// Permission level per step: none 0, read 1, write 2, admin 3. Escalation
/// is any strict increase between adjacent steps.
fn has_permission_escalation(steps: &[PipelineStep]) -> bool {
    let levels: Vec<u8> = steps.iter().map(permission_level).collect();
    levels.windows(2).any(|pair| pair[1] > pair[0])
}

fn permission_level(step: &PipelineStep) -> u8 {
    if step.has_permission("admin") {
        3
    } else if step.has_permission("write") {
        2
    } else if step.has_permission("read") {
        1
    } else {
        0
    }
}

/// Security steps ordered before the earliest deploy step. With no deploy
/// step, every security step counts.
fn security_before_deploy(steps: &[PipelineStep], security_steps: &[&PipelineStep]) -> f64 {
    let first_deploy = steps
        .iter()
        .filter(|s| s.step_type == StepType::Deploy)
        .map(|s| s.execution_order)
        .min();
    match first_deploy {
        Some(deploy_order) => security_steps
            .iter()
            .filter(|s| s.execution_order < deploy_order)
            .count() as f64,
        None => security_steps.len() as f64,
    }
}
