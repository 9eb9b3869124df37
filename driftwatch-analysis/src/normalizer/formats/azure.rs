//! Azure DevOps: stages → jobs (or legacy phases) → steps, flattened.

use serde_json::Value;

pub fn steps(doc: &Value) -> Option<Vec<Value>> {
    let stages = doc.get("stages")?.as_array()?;
    let mut out = Vec::new();
    for stage in stages {
        let groups = stage
            .get("jobs")
            .or_else(|| stage.get("phases"))
            .and_then(Value::as_array);
        match groups {
            Some(jobs) => {
                for job in jobs {
                    match job.get("steps").and_then(Value::as_array) {
                        Some(steps) if !steps.is_empty() => out.extend(steps.iter().cloned()),
                        _ => out.push(job.clone()),
                    }
                }
            }
            None => out.push(stage.clone()),
        }
    }
    (!out.is_empty()).then_some(out)
}
