//! Analysis output types: drift score, risk level, issues, explanations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::features::FeatureVector;
use crate::types::run::PipelineStep;

/// Risk tier. A pure function of the drift score — never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Score → risk mapping: [0,30] low, (30,50] medium, (50,70] high,
    /// (70,100] critical.
    pub fn from_score(score: f64) -> Self {
        if score <= 30.0 {
            Self::Low
        } else if score <= 50.0 {
            Self::Medium
        } else if score <= 70.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Issue taxonomy — each significant feature deviation maps to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    SecurityScanRemoved,
    PermissionEscalation,
    SecretsExposure,
    ApprovalBypassed,
    ExecutionOrderChanged,
}

impl IssueType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SecurityScanRemoved => "security_scan_removed",
            Self::PermissionEscalation => "permission_escalation",
            Self::SecretsExposure => "secrets_exposure",
            Self::ApprovalBypassed => "approval_bypassed",
            Self::ExecutionOrderChanged => "execution_order_changed",
        }
    }
}

/// Issue severity, assigned from the z-score magnitude tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A single detected issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    /// The feature (or step context) the issue was raised from.
    pub step: String,
}

/// A completed drift analysis. Created once, stored once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Globally unique id (UUID v4).
    pub id: String,
    pub pipeline_name: String,
    /// Weighted aggregate deviation, clipped to [0,100], 2 decimals.
    pub drift_score: f64,
    pub risk_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
    pub issues: Vec<Issue>,
    pub explanations: Vec<String>,
    pub feature_vector: FeatureVector,
    pub parsed_steps: Vec<PipelineStep>,
    /// Raw anomaly score from an external scorer, when one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anomaly: Option<bool>,
}

impl Analysis {
    /// Number of issues at high or critical severity.
    pub fn critical_issue_count(&self) -> u64 {
        self.issues
            .iter()
            .filter(|i| i.severity >= Severity::High)
            .count() as u64
    }
}
