//! GitHub Actions: `jobs` is an array; steps nest under each job.

use serde_json::Value;

pub fn steps(doc: &Value) -> Option<Vec<Value>> {
    let jobs = doc.get("jobs")?.as_array()?;
    let mut out = Vec::new();
    for job in jobs {
        match job.get("steps").and_then(Value::as_array) {
            Some(steps) if !steps.is_empty() => out.extend(steps.iter().cloned()),
            _ => out.push(job.clone()),
        }
    }
    (!out.is_empty()).then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_job_steps() {
        let doc = json!({"jobs": [
            {"name": "build", "steps": [{"name": "checkout"}, {"name": "compile"}]},
            {"name": "lint"}
        ]});
        let steps = steps(&doc).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["name"], "checkout");
        assert_eq!(steps[2]["name"], "lint");
    }

    #[test]
    fn none_without_jobs_array() {
        assert!(steps(&json!({"workflow_run": {"id": 1}})).is_none());
    }
}
