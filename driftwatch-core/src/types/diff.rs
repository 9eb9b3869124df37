//! Pipeline diff types: per-step status across two canonical runs.

use serde::{Deserialize, Serialize};

/// Change classification for a step, relative to the side it appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Unchanged,
    Added,
    Removed,
    Modified,
}

/// One step in a diff result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStep {
    pub name: String,
    pub status: DiffStatus,
    /// Carried through from the canonical step on the originating side.
    pub security: bool,
}

/// Baseline-vs-current diff. Both lists are sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDiff {
    pub baseline: Vec<DiffStep>,
    pub current: Vec<DiffStep>,
}
