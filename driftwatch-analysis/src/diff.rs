//! Pipeline diff: name-keyed set difference with per-step change
//! classification.
//!
//! Baseline-side entries report `unchanged` even when the current side is
//! `modified` — the current side is where change is surfaced.

use rustc_hash::{FxHashMap, FxHashSet};

use driftwatch_core::types::diff::{DiffStatus, DiffStep, PipelineDiff};
use driftwatch_core::types::run::PipelineStep;

/// Diff two step lists, matching by step name. Duplicate names within a
/// side collapse to their first occurrence. Both outputs are sorted by name.
pub fn diff(baseline: &[PipelineStep], current: &[PipelineStep]) -> PipelineDiff {
    let baseline_by_name = index_by_name(baseline);
    let current_by_name = index_by_name(current);

    let mut baseline_side = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for step in baseline {
        if !seen.insert(step.name.as_str()) {
            continue;
        }
        let status = if current_by_name.contains_key(step.name.as_str()) {
            DiffStatus::Unchanged
        } else {
            DiffStatus::Removed
        };
        baseline_side.push(DiffStep {
            name: step.name.clone(),
            status,
            security: step.security,
        });
    }

    let mut current_side = Vec::new();
    seen.clear();
    for step in current {
        if !seen.insert(step.name.as_str()) {
            continue;
        }
        let status = match baseline_by_name.get(step.name.as_str()) {
            None => DiffStatus::Added,
            Some(base) if step_changed(base, step) => DiffStatus::Modified,
            Some(_) => DiffStatus::Unchanged,
        };
        current_side.push(DiffStep {
            name: step.name.clone(),
            status,
            security: step.security,
        });
    }

    baseline_side.sort_by(|a, b| a.name.cmp(&b.name));
    current_side.sort_by(|a, b| a.name.cmp(&b.name));
    PipelineDiff { baseline: baseline_side, current: current_side }
}

fn index_by_name(steps: &[PipelineStep]) -> FxHashMap<&str, &PipelineStep> {
    let mut map = FxHashMap::default();
    for step in steps {
        map.entry(step.name.as_str()).or_insert(step);
    }
    map
}

/// Permissions are kept sorted and deduplicated by the normalizer, so plain
/// equality is canonical set comparison.
fn step_changed(base: &PipelineStep, current: &PipelineStep) -> bool {
    base.permissions != current.permissions
        || base.security != current.security
        || base.secrets != current.secrets
        || base.approval != current.approval
}
