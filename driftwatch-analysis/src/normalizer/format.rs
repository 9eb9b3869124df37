//! Heuristic log-format detection.

use serde_json::Value;

/// The recognized pipeline-log dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogFormat {
    GithubActions,
    GitlabCi,
    Jenkins,
    AzureDevops,
    CircleCi,
    Standard,
    Generic,
}

impl LogFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GithubActions => "github-actions",
            Self::GitlabCi => "gitlab-ci",
            Self::Jenkins => "jenkins",
            Self::AzureDevops => "azure-devops",
            Self::CircleCi => "circleci",
            Self::Standard => "standard",
            Self::Generic => "generic",
        }
    }
}

/// Detect the dialect of a log document. First match wins; anything
/// unrecognized is `Generic`.
///
/// `stages` alone is ambiguous: GitLab declares stage *names* (strings),
/// while Jenkins and Azure nest stage *objects*. The object checks inspect
/// the first element to disambiguate.
pub fn detect(doc: &Value) -> LogFormat {
    let Some(obj) = doc.as_object() else {
        return LogFormat::Generic;
    };

    if obj.contains_key("workflow")
        || obj.contains_key("workflow_run")
        || obj.get("jobs").is_some_and(Value::is_array)
    {
        return LogFormat::GithubActions;
    }

    if stage_names_are_strings(obj.get("stages"))
        || obj.contains_key("before_script")
        || obj.contains_key("after_script")
        || obj.contains_key("image")
        || obj.contains_key("services")
    {
        return LogFormat::GitlabCi;
    }

    if first_stage_has(obj.get("stages"), &["steps"]) {
        return LogFormat::Jenkins;
    }

    if first_stage_has(obj.get("stages"), &["jobs", "phases"]) {
        return LogFormat::AzureDevops;
    }

    if obj.get("jobs").is_some_and(Value::is_object) {
        return LogFormat::CircleCi;
    }

    if obj.get("steps").is_some_and(Value::is_array) {
        return LogFormat::Standard;
    }

    LogFormat::Generic
}

fn stage_names_are_strings(stages: Option<&Value>) -> bool {
    stages
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .is_some_and(Value::is_string)
}

fn first_stage_has(stages: Option<&Value>, keys: &[&str]) -> bool {
    stages
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_object)
        .is_some_and(|first| keys.iter().any(|k| first.contains_key(*k)))
}
