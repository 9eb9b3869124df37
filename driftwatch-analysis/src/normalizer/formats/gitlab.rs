//! GitLab CI: jobs are top-level mapping entries; reserved keys and hidden
//! (dot-prefixed) templates are skipped. Document order is preserved.

use serde_json::Value;

const RESERVED_KEYS: [&str; 10] = [
    "stages", "before_script", "after_script", "image", "services",
    "variables", "workflow", "default", "include", "cache",
];

const JOB_MARKER_KEYS: [&str; 5] = ["script", "stage", "image", "when", "trigger"];

pub fn steps(doc: &Value) -> Option<Vec<Value>> {
    let obj = doc.as_object()?;
    let mut out = Vec::new();
    for (key, value) in obj {
        if RESERVED_KEYS.contains(&key.as_str()) || key.starts_with('.') {
            continue;
        }
        let Some(job) = value.as_object() else { continue };
        if !JOB_MARKER_KEYS.iter().any(|k| job.contains_key(*k)) {
            continue;
        }
        let mut step = job.clone();
        step.entry("name").or_insert_with(|| Value::String(key.clone()));
        out.push(Value::Object(step));
    }
    (!out.is_empty()).then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn jobs_from_mapping_keys_in_document_order() {
        let doc = json!({
            "stages": ["build", "deploy"],
            "build-app": {"stage": "build", "script": ["make"]},
            ".hidden-template": {"script": ["echo"]},
            "deploy-app": {"stage": "deploy", "script": ["make deploy"]}
        });
        let steps = steps(&doc).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0]["name"], "build-app");
        assert_eq!(steps[1]["name"], "deploy-app");
    }

    #[test]
    fn none_when_only_reserved_keys() {
        assert!(steps(&json!({"image": "alpine", "variables": {}})).is_none());
    }
}
