//! Canonical pipeline step and run — the normalizer's output type.
//!
//! Every downstream component (features, detector, diff, storage) consumes
//! these types only; raw vendor JSON never crosses the normalizer boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Step classification, from an explicit `type`/`category`/`kind` field or
/// inferred from name keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Security,
    Build,
    Test,
    Deploy,
    Approval,
    #[default]
    Other,
}

impl StepType {
    /// Classification name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Build => "build",
            Self::Test => "test",
            Self::Deploy => "deploy",
            Self::Approval => "approval",
            Self::Other => "other",
        }
    }
}

/// A single normalized pipeline step.
///
/// `permissions` is kept sorted and deduplicated so set comparison by
/// serialized form is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStep {
    /// Non-empty; synthesized as `step-<index>` when the source has none.
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// 1-based position in the run.
    pub execution_order: u32,
    /// Opaque vendor status string; not consumed by the scorer.
    #[serde(default)]
    pub status: String,
    /// Deduplicated, sorted permission tokens (`read`, `write`, `admin`, ...).
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Whether the step is security-related.
    pub security: bool,
    /// Whether the step references credentials, tokens, or keys.
    pub secrets: bool,
    /// Whether the step is a manual approval gate.
    pub approval: bool,
}

impl PipelineStep {
    /// Whether the given permission token is present.
    pub fn has_permission(&self, token: &str) -> bool {
        self.permissions.iter().any(|p| p == token)
    }
}

/// A normalized pipeline run: name, timestamp, and ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    pub pipeline: String,
    pub timestamp: DateTime<Utc>,
    pub steps: Vec<PipelineStep>,
}
