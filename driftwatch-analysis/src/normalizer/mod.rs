//! Universal log normalizer.
//!
//! Accepts any JSON document (or a string containing one), detects the
//! vendor dialect, and produces a canonical [`PipelineRun`]. Missing fields
//! never fail — names, timestamps, and steps are synthesized. Only malformed
//! JSON, or a document that is neither object nor array, is an error.

pub mod fields;
pub mod format;
pub mod formats;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use driftwatch_core::errors::normalize_error::NormalizeError;
use driftwatch_core::types::run::PipelineRun;

pub use format::LogFormat;

const PIPELINE_NAME_KEYS: [&str; 10] = [
    "pipeline",
    "pipelineName",
    "name",
    "workflow",
    "workflow_name",
    "job.name",
    "definition.name",
    "repository.name",
    "project.name",
    "pipeline_name",
];

const TIMESTAMP_KEYS: [&str; 10] = [
    "timestamp",
    "created_at",
    "time",
    "started_at",
    "finished_at",
    "date",
    "run_date",
    "created",
    "start_time",
    "end_time",
];

/// Normalize a raw JSON value. A string value is treated as embedded JSON
/// and parsed first.
pub fn normalize(doc: &Value) -> Result<PipelineRun, NormalizeError> {
    match doc {
        Value::String(embedded) => {
            let parsed: Value = serde_json::from_str(embedded)
                .map_err(|e| NormalizeError::InvalidJson { message: e.to_string() })?;
            normalize_document(&parsed)
        }
        other => normalize_document(other),
    }
}

/// Normalize a JSON document from text.
pub fn normalize_str(input: &str) -> Result<PipelineRun, NormalizeError> {
    let parsed: Value = serde_json::from_str(input)
        .map_err(|e| NormalizeError::InvalidJson { message: e.to_string() })?;
    normalize_document(&parsed)
}

fn normalize_document(doc: &Value) -> Result<PipelineRun, NormalizeError> {
    if !doc.is_object() && !doc.is_array() {
        return Err(NormalizeError::NotADocument { found: json_type_name(doc) });
    }

    let format = format::detect(doc);
    let raw_steps = extract_raw_steps(doc, format);
    let steps = raw_steps
        .iter()
        .enumerate()
        .map(|(i, raw)| fields::normalize_step(raw, i))
        .collect();

    let pipeline = pipeline_name(doc, format);
    let timestamp = extract_timestamp(doc).unwrap_or_else(Utc::now);

    tracing::debug!(
        format = format.name(),
        pipeline = %pipeline,
        steps = raw_steps.len(),
        "normalized pipeline log"
    );

    Ok(PipelineRun { pipeline, timestamp, steps })
}

/// Dialect extraction with recursive-search fallback. Only the generic path
/// applies the whole-document-as-one-step last resort.
fn extract_raw_steps(doc: &Value, format: LogFormat) -> Vec<Value> {
    let dialect_steps = match format {
        LogFormat::GithubActions => formats::github::steps(doc),
        LogFormat::GitlabCi => formats::gitlab::steps(doc),
        LogFormat::Jenkins => formats::jenkins::steps(doc),
        LogFormat::AzureDevops => formats::azure::steps(doc),
        LogFormat::CircleCi => formats::circleci::steps(doc),
        LogFormat::Standard => formats::standard::steps(doc),
        LogFormat::Generic => return formats::generic::steps(doc),
    };
    dialect_steps.unwrap_or_else(|| formats::generic::search_steps(doc))
}

fn pipeline_name(doc: &Value, format: LogFormat) -> String {
    for key in PIPELINE_NAME_KEYS {
        if let Some(name) = path_string(doc, key) {
            return name;
        }
    }
    let fallback_key = match format {
        LogFormat::GithubActions => Some("repository.full_name"),
        LogFormat::GitlabCi => Some("project.name"),
        _ => None,
    };
    if let Some(name) = fallback_key.and_then(|key| path_string(doc, key)) {
        return name;
    }
    format!("pipeline-{}", Utc::now().timestamp_millis())
}

fn extract_timestamp(doc: &Value) -> Option<DateTime<Utc>> {
    TIMESTAMP_KEYS
        .iter()
        .filter_map(|key| doc.get(*key))
        .find_map(parse_timestamp)
}

/// Parse an RFC3339-ish value: RFC3339, a couple of common naive layouts
/// (assumed UTC), or an epoch number in seconds or milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
                    return Some(naive.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            if epoch >= 1_000_000_000_000 {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            }
        }
        _ => None,
    }
}

/// Dotted-path lookup returning a non-empty string.
fn path_string(doc: &Value, path: &str) -> Option<String> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    current
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_document_json() {
        let err = normalize(&json!(42)).unwrap_err();
        assert!(matches!(err, NormalizeError::NotADocument { found: "number" }));
    }

    #[test]
    fn rejects_malformed_embedded_json() {
        let err = normalize(&json!("{not json")).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidJson { .. }));
    }

    #[test]
    fn embedded_json_string_is_parsed() {
        let run = normalize(&json!("{\"pipeline\": \"ci\", \"steps\": [{\"name\": \"a\"}]}"))
            .unwrap();
        assert_eq!(run.pipeline, "ci");
        assert_eq!(run.steps.len(), 1);
    }

    #[test]
    fn pipeline_name_priority() {
        let run = normalize(&json!({"name": "named", "pipeline": "first", "steps": []})).unwrap();
        assert_eq!(run.pipeline, "first");
    }

    #[test]
    fn github_falls_back_to_repository_full_name() {
        let run = normalize(&json!({
            "workflow_run": {"id": 9},
            "repository": {"full_name": "org/app"}
        }))
        .unwrap();
        assert_eq!(run.pipeline, "org/app");
    }

    #[test]
    fn synthesized_pipeline_name_when_absent() {
        let run = normalize(&json!({"data": {"x": 1}})).unwrap();
        assert!(run.pipeline.starts_with("pipeline-"));
        assert!(run.pipeline["pipeline-".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn parses_rfc3339_timestamp() {
        let run = normalize(&json!({
            "timestamp": "2026-03-01T10:30:00Z",
            "steps": []
        }))
        .unwrap();
        assert_eq!(run.timestamp.to_rfc3339(), "2026-03-01T10:30:00+00:00");
    }

    #[test]
    fn parses_epoch_millis_timestamp() {
        let run = normalize(&json!({"created_at": 1_760_000_000_000_i64, "steps": []})).unwrap();
        assert_eq!(run.timestamp.timestamp_millis(), 1_760_000_000_000);
    }

    #[test]
    fn unparseable_timestamp_defaults_to_now() {
        let before = Utc::now();
        let run = normalize(&json!({"timestamp": "not a date", "steps": []})).unwrap();
        assert!(run.timestamp >= before);
    }

    #[test]
    fn root_array_elements_become_steps() {
        let run = normalize(&json!([{"name": "one"}, {"name": "two"}])).unwrap();
        assert_eq!(run.steps.len(), 2);
        assert_eq!(run.steps[1].execution_order, 2);
    }
}
