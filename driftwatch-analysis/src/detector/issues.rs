//! Issue mapping and explanations from significant feature deviations.
//!
//! This layer is independent of how the aggregate score was produced — the
//! statistical and remote scorers both feed it the same per-feature
//! deviations against the trained baseline.

use uuid::Uuid;

use driftwatch_core::types::analysis::{Issue, IssueType, Severity};
use driftwatch_core::types::features::idx;

use super::deviation::{FeatureDeviation, MagnitudeTier};

/// Which direction of drift raises an issue for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Increase,
    Decrease,
    Any,
}

/// Feature → issue rules. Features not listed here still explain themselves
/// but never raise an issue.
const ISSUE_RULES: [(usize, Direction, IssueType); 10] = [
    (idx::SECURITY_SCAN_COUNT, Direction::Decrease, IssueType::SecurityScanRemoved),
    (idx::SECURITY_STEP_COUNT, Direction::Decrease, IssueType::SecurityScanRemoved),
    (idx::SECURITY_STEP_RATIO, Direction::Decrease, IssueType::SecurityScanRemoved),
    (idx::ADMIN_PERMISSION_COUNT, Direction::Increase, IssueType::PermissionEscalation),
    (idx::PERMISSION_ESCALATION, Direction::Increase, IssueType::PermissionEscalation),
    (idx::SECRETS_USAGE_COUNT, Direction::Any, IssueType::SecretsExposure),
    (idx::SECRETS_WITH_WRITE_COUNT, Direction::Increase, IssueType::SecretsExposure),
    (idx::APPROVAL_STEP_COUNT, Direction::Decrease, IssueType::ApprovalBypassed),
    (idx::SECURITY_BEFORE_DEPLOY, Direction::Decrease, IssueType::ExecutionOrderChanged),
    (idx::NORMALIZED_FIRST_SECURITY_STEP, Direction::Increase, IssueType::ExecutionOrderChanged),
];

/// Human-readable descriptor per feature, in frozen index order.
const DESCRIPTORS: [&str; 17] = [
    "Security scan count",
    "Security step count",
    "Read permission usage",
    "Write permission usage",
    "Admin permission usage",
    "Secrets usage",
    "Approval gate count",
    "Average security step position",
    "Permission escalation pattern",
    "Total step count",
    "Security step ratio",
    "First security step position",
    "Last security step position",
    "Secrets used with write access",
    "Steps holding admin permissions",
    "Security checks before deployment",
    "Average step position",
];

/// Map significant deviations to issues, one per matching feature rule.
pub fn derive_issues(deviations: &[FeatureDeviation]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for &(index, direction, issue_type) in &ISSUE_RULES {
        let dev = &deviations[index];
        if !dev.is_significant() || !direction_matches(direction, dev.z) {
            continue;
        }
        // An observed escalation sequence is always a high-severity finding,
        // independent of how far the z travelled.
        let severity = if index == idx::PERMISSION_ESCALATION {
            Severity::High
        } else {
            MagnitudeTier::from_z(dev.z).severity()
        };
        issues.push(Issue {
            id: Uuid::new_v4().to_string(),
            issue_type,
            severity,
            description: issue_description(issue_type, dev),
            step: dev.name.to_string(),
        });
    }
    issues
}

/// One explanation line per significant deviation.
pub fn derive_explanations(deviations: &[FeatureDeviation]) -> Vec<String> {
    deviations
        .iter()
        .filter(|d| d.is_significant())
        .map(|d| {
            let direction = if d.z > 0.0 { "increased" } else { "decreased" };
            format!(
                "{} {} {} ({} vs baseline {}, change: {})",
                DESCRIPTORS[d.index],
                direction,
                MagnitudeTier::from_z(d.z).adverb(),
                fmt_num(d.value),
                fmt_num(d.mean),
                fmt_num((d.value - d.mean).abs()),
            )
        })
        .collect()
}

fn direction_matches(direction: Direction, z: f64) -> bool {
    match direction {
        Direction::Increase => z > 0.0,
        Direction::Decrease => z < 0.0,
        Direction::Any => true,
    }
}

fn issue_description(issue_type: IssueType, dev: &FeatureDeviation) -> String {
    let descriptor = DESCRIPTORS[dev.index];
    let value = fmt_num(dev.value);
    let mean = fmt_num(dev.mean);
    match issue_type {
        IssueType::SecurityScanRemoved => {
            format!("Security coverage reduced: {descriptor} dropped to {value} from baseline {mean}")
        }
        IssueType::PermissionEscalation => {
            format!("Elevated permissions detected: {descriptor} rose to {value} from baseline {mean}")
        }
        IssueType::SecretsExposure => {
            format!("Credential exposure risk: {descriptor} changed to {value} from baseline {mean}")
        }
        IssueType::ApprovalBypassed => {
            format!("Manual approval coverage dropped to {value} from baseline {mean}")
        }
        IssueType::ExecutionOrderChanged => {
            format!("Security ordering shifted: {descriptor} moved to {value} from baseline {mean}")
        }
    }
}

/// Whole numbers print bare; everything else keeps two decimals.
fn fmt_num(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.2}")
    }
}
