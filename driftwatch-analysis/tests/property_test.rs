//! Property tests: normalizer totality, extractor finiteness, score bounds,
//! diff name partition.

use proptest::prelude::*;
use serde_json::{json, Value};

use driftwatch_analysis::baseline;
use driftwatch_analysis::detector::zscore::ZScoreScorer;
use driftwatch_analysis::diff::diff;
use driftwatch_analysis::features;
use driftwatch_analysis::normalizer;
use driftwatch_core::types::analysis::RiskLevel;
use driftwatch_core::types::features::{FeatureVector, FEATURE_COUNT};
use driftwatch_core::types::run::{PipelineRun, PipelineStep, StepType};

// ─── Strategies ────────────────────────────────────────────────────────────

fn raw_step() -> impl Strategy<Value = Value> {
    (
        proptest::option::of("[a-zA-Z ._-]{0,20}"),
        proptest::option::of(0u64..50),
        proptest::collection::vec("[a-z]{1,8}", 0..4),
        proptest::option::of("[a-zA-Z $={}-]{0,30}"),
    )
        .prop_map(|(name, order, permissions, script)| {
            let mut obj = serde_json::Map::new();
            if let Some(name) = name {
                obj.insert("name".to_string(), json!(name));
            }
            if let Some(order) = order {
                obj.insert("order".to_string(), json!(order));
            }
            if !permissions.is_empty() {
                obj.insert("permissions".to_string(), json!(permissions));
            }
            if let Some(script) = script {
                obj.insert("script".to_string(), json!(script));
            }
            Value::Object(obj)
        })
}

fn canonical_step() -> impl Strategy<Value = PipelineStep> {
    (
        "[a-z]{1,12}",
        1u32..40,
        proptest::sample::subsequence(vec!["read", "write", "admin"], 0..=3),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, order, permissions, security, secrets, approval)| PipelineStep {
            name,
            step_type: StepType::Other,
            execution_order: order,
            status: String::new(),
            permissions: permissions.into_iter().map(str::to_string).collect(),
            security,
            secrets,
            approval,
        })
}

fn canonical_run() -> impl Strategy<Value = PipelineRun> {
    proptest::collection::vec(canonical_step(), 0..12).prop_map(|steps| PipelineRun {
        pipeline: "prop-ci".to_string(),
        timestamp: chrono::Utc::now(),
        steps,
    })
}

fn feature_vector() -> impl Strategy<Value = FeatureVector> {
    proptest::collection::vec(-50.0f64..50.0, FEATURE_COUNT)
        .prop_map(|values| FeatureVector::from_slice(&values).unwrap())
}

// ─── Properties ────────────────────────────────────────────────────────────

proptest! {
    /// Any object with a steps array normalizes, and the canonical
    /// invariants hold on the result.
    #[test]
    fn normalizer_is_total_over_step_documents(steps in proptest::collection::vec(raw_step(), 0..10)) {
        let doc = json!({"pipeline": "prop", "steps": steps});
        let run = normalizer::normalize(&doc).unwrap();
        for step in &run.steps {
            prop_assert!(!step.name.is_empty());
            prop_assert!(step.execution_order >= 1);
            let mut sorted = step.permissions.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(&step.permissions, &sorted);
        }
    }

    /// Extraction always yields 17 finite values.
    #[test]
    fn extraction_is_finite(run in canonical_run()) {
        let vector = features::extract(&run).unwrap();
        prop_assert_eq!(vector.values().len(), FEATURE_COUNT);
        for (_, value) in vector.named() {
            prop_assert!(value.is_finite());
        }
    }

    /// Scores stay in [0,100] and risk is exactly the score function.
    #[test]
    fn score_bounds_and_risk_function(
        baselines in proptest::collection::vec(feature_vector(), 2..6),
        probe in feature_vector(),
    ) {
        let model = baseline::train(&baselines, "prop-ci").unwrap();
        let outcome = ZScoreScorer::new().evaluate(&probe, &model);
        prop_assert!((0.0..=100.0).contains(&outcome.drift_score));
        prop_assert_eq!(outcome.risk_level, RiskLevel::from_score(outcome.drift_score));
    }

    /// Scoring the mean vector of any trained model yields zero drift.
    #[test]
    fn mean_vector_scores_zero(baselines in proptest::collection::vec(feature_vector(), 2..6)) {
        let model = baseline::train(&baselines, "prop-ci").unwrap();
        let outcome = ZScoreScorer::new().evaluate(&model.mean_vector(), &model);
        prop_assert_eq!(outcome.drift_score, 0.0);
        prop_assert_eq!(outcome.risk_level, RiskLevel::Low);
    }

    /// The diff partitions names: every distinct input name appears, and a
    /// one-sided name appears exactly once.
    #[test]
    fn diff_partitions_names(
        baseline_steps in proptest::collection::vec(canonical_step(), 0..10),
        current_steps in proptest::collection::vec(canonical_step(), 0..10),
    ) {
        let result = diff(&baseline_steps, &current_steps);

        let mut input_names: Vec<&str> = baseline_steps
            .iter()
            .chain(current_steps.iter())
            .map(|s| s.name.as_str())
            .collect();
        input_names.sort();
        input_names.dedup();

        let mut output_names: Vec<&str> = result
            .baseline
            .iter()
            .chain(result.current.iter())
            .map(|s| s.name.as_str())
            .collect();
        output_names.sort();
        output_names.dedup();

        prop_assert_eq!(input_names, output_names);

        let baseline_names: std::collections::HashSet<&str> =
            baseline_steps.iter().map(|s| s.name.as_str()).collect();
        let current_names: std::collections::HashSet<&str> =
            current_steps.iter().map(|s| s.name.as_str()).collect();
        for name in baseline_names.symmetric_difference(&current_names) {
            let occurrences = result
                .baseline
                .iter()
                .chain(result.current.iter())
                .filter(|s| s.name == *name)
                .count();
            prop_assert_eq!(occurrences, 1);
        }
    }
}
