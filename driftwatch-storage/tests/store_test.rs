//! Analysis store tests: ordering, filtering, statistics, round-trips.

use chrono::{Duration, Utc};
use uuid::Uuid;

use driftwatch_core::types::analysis::{Analysis, Issue, IssueType, RiskLevel, Severity};
use driftwatch_core::types::features::FeatureVector;
use driftwatch_storage::queries::analyses::AnalysisQuery;
use driftwatch_storage::AnalysisStore;

fn analysis(pipeline: &str, score: f64, minutes_ago: i64) -> Analysis {
    Analysis {
        id: Uuid::new_v4().to_string(),
        pipeline_name: pipeline.to_string(),
        drift_score: score,
        risk_level: RiskLevel::from_score(score),
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        issues: Vec::new(),
        explanations: vec!["Total step count increased slightly (6 vs baseline 5, change: 1)".to_string()],
        feature_vector: FeatureVector::zeros(),
        parsed_steps: Vec::new(),
        anomaly_score: None,
        is_anomaly: None,
    }
}

fn issue(severity: Severity) -> Issue {
    Issue {
        id: Uuid::new_v4().to_string(),
        issue_type: IssueType::PermissionEscalation,
        severity,
        description: "escalation".to_string(),
        step: "adminPermissionCount".to_string(),
    }
}

#[test]
fn upsert_then_get_by_id_round_trips() {
    let store = AnalysisStore::open_in_memory().unwrap();
    let mut stored = analysis("ci", 42.5, 1);
    stored.issues.push(issue(Severity::High));
    store.upsert(&stored).unwrap();

    let loaded = store.get_by_id(&stored.id).unwrap().unwrap();
    assert_eq!(loaded, stored);
}

#[test]
fn upsert_by_same_id_replaces() {
    let store = AnalysisStore::open_in_memory().unwrap();
    let mut a = analysis("ci", 10.0, 5);
    store.upsert(&a).unwrap();
    a.drift_score = 20.0;
    store.upsert(&a).unwrap();

    let all = store.recent(10).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].drift_score, 20.0);
}

#[test]
fn query_is_newest_first() {
    let store = AnalysisStore::open_in_memory().unwrap();
    let old = analysis("ci", 10.0, 60);
    let mid = analysis("ci", 20.0, 30);
    let new = analysis("ci", 30.0, 1);
    for a in [&old, &mid, &new] {
        store.upsert(a).unwrap();
    }

    let history = store.get_by_pipeline("ci", 10).unwrap();
    let ids: Vec<&str> = history.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![new.id.as_str(), mid.id.as_str(), old.id.as_str()]);
}

#[test]
fn newest_upsert_lands_at_the_head() {
    let store = AnalysisStore::open_in_memory().unwrap();
    store.upsert(&analysis("ci", 10.0, 60)).unwrap();
    let newest = analysis("ci", 50.0, 0);
    store.upsert(&newest).unwrap();

    let head = &store.get_by_pipeline("ci", 10).unwrap()[0];
    assert_eq!(head.id, newest.id);
}

#[test]
fn pipeline_filter_and_limit() {
    let store = AnalysisStore::open_in_memory().unwrap();
    for i in 0..5 {
        store.upsert(&analysis("ci", 10.0, i)).unwrap();
        store.upsert(&analysis("web", 20.0, i)).unwrap();
    }

    let ci_only = store.get_by_pipeline("ci", 3).unwrap();
    assert_eq!(ci_only.len(), 3);
    assert!(ci_only.iter().all(|a| a.pipeline_name == "ci"));
}

#[test]
fn since_filter_cuts_older_rows() {
    let store = AnalysisStore::open_in_memory().unwrap();
    store.upsert(&analysis("ci", 10.0, 120)).unwrap();
    store.upsert(&analysis("ci", 20.0, 10)).unwrap();

    let recent = store
        .query(&AnalysisQuery {
            pipeline: Some("ci".to_string()),
            limit: Some(100),
            since: Some(Utc::now() - Duration::minutes(60)),
        })
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].drift_score, 20.0);
}

#[test]
fn limit_is_clamped_to_one_thousand() {
    let store = AnalysisStore::open_in_memory().unwrap();
    store.upsert(&analysis("ci", 10.0, 1)).unwrap();
    // A zero/oversized limit does not panic and still behaves.
    assert_eq!(store.recent(0).unwrap().len(), 1);
    assert_eq!(store.recent(1_000_000).unwrap().len(), 1);
}

#[test]
fn pipeline_bounds_returns_oldest_and_newest() {
    let store = AnalysisStore::open_in_memory().unwrap();
    assert!(store.pipeline_bounds("ci").unwrap().is_none());

    let oldest = analysis("ci", 5.0, 90);
    let newest = analysis("ci", 15.0, 1);
    store.upsert(&oldest).unwrap();
    store.upsert(&analysis("ci", 10.0, 45)).unwrap();
    store.upsert(&newest).unwrap();

    let (first, last) = store.pipeline_bounds("ci").unwrap().unwrap();
    assert_eq!(first.id, oldest.id);
    assert_eq!(last.id, newest.id);
}

#[test]
fn stats_average_and_critical_issue_count() {
    let store = AnalysisStore::open_in_memory().unwrap();
    let mut flagged = analysis("ci", 30.0, 5);
    flagged.issues.push(issue(Severity::Critical));
    flagged.issues.push(issue(Severity::High));
    flagged.issues.push(issue(Severity::Low));
    store.upsert(&flagged).unwrap();
    store.upsert(&analysis("ci", 10.0, 10)).unwrap();

    let stats = store.stats(false).unwrap();
    assert_eq!(stats.total_analyses, 2);
    assert!((stats.average_score - 20.0).abs() < 0.01);
    // Low-severity issues are not counted.
    assert_eq!(stats.critical_issues, 2);
    assert!(stats.last_analysis.is_some());
}

#[test]
fn stats_exclude_test_data_pipelines() {
    let store = AnalysisStore::open_in_memory().unwrap();
    store.upsert(&analysis("prod-ci", 10.0, 5)).unwrap();
    store.upsert(&analysis("Sample-Pipeline", 90.0, 4)).unwrap();
    store.upsert(&analysis("mock_run", 90.0, 3)).unwrap();
    store.upsert(&analysis("integration-TEST", 90.0, 2)).unwrap();
    store.upsert(&analysis("dummy", 90.0, 1)).unwrap();

    let filtered = store.stats(true).unwrap();
    assert_eq!(filtered.total_analyses, 1);
    assert!((filtered.average_score - 10.0).abs() < 0.01);

    let unfiltered = store.stats(false).unwrap();
    assert_eq!(unfiltered.total_analyses, 5);
}

#[test]
fn empty_store_stats_are_zeroed() {
    let store = AnalysisStore::open_in_memory().unwrap();
    let stats = store.stats(true).unwrap();
    assert_eq!(stats.total_analyses, 0);
    assert_eq!(stats.average_score, 0.0);
    assert_eq!(stats.critical_issues, 0);
    assert!(stats.last_analysis.is_none());
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("driftwatch.db");
    let stored = analysis("ci", 33.0, 1);
    {
        let store = AnalysisStore::open(&path).unwrap();
        store.upsert(&stored).unwrap();
    }
    let reopened = AnalysisStore::open(&path).unwrap();
    let loaded = reopened.get_by_id(&stored.id).unwrap().unwrap();
    assert_eq!(loaded, stored);
}
