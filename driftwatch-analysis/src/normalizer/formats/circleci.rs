//! CircleCI: `jobs` is a mapping; steps are strings ("checkout") or
//! single-key wrappers ({"run": {...}}), unwrapped here.

use serde_json::{json, Value};

pub fn steps(doc: &Value) -> Option<Vec<Value>> {
    let jobs = doc.get("jobs")?.as_object()?;
    let mut out = Vec::new();
    for (job_name, job) in jobs {
        match job.get("steps").and_then(Value::as_array) {
            Some(steps) if !steps.is_empty() => {
                out.extend(steps.iter().map(unwrap_step));
            }
            _ => {
                let mut step = job.as_object().cloned().unwrap_or_default();
                step.entry("name").or_insert_with(|| Value::String(job_name.clone()));
                out.push(Value::Object(step));
            }
        }
    }
    (!out.is_empty()).then_some(out)
}

fn unwrap_step(step: &Value) -> Value {
    match step {
        Value::String(s) => json!({ "name": s }),
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((key, Value::Object(inner_map))) => {
                let mut unwrapped = inner_map.clone();
                unwrapped
                    .entry("name")
                    .or_insert_with(|| Value::String(key.clone()));
                Value::Object(unwrapped)
            }
            Some((key, Value::String(command))) => json!({ "name": key, "command": command }),
            _ => step.clone(),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_string_and_run_steps() {
        let doc = json!({"jobs": {"build": {"steps": [
            "checkout",
            {"run": {"name": "unit tests", "command": "cargo test"}},
            {"run": "make lint"}
        ]}}});
        let steps = steps(&doc).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["name"], "checkout");
        assert_eq!(steps[1]["name"], "unit tests");
        assert_eq!(steps[2]["name"], "run");
        assert_eq!(steps[2]["command"], "make lint");
    }

    #[test]
    fn job_without_steps_becomes_one_step() {
        let doc = json!({"jobs": {"noop": {"docker": [{"image": "alpine"}]}}});
        let steps = steps(&doc).unwrap();
        assert_eq!(steps[0]["name"], "noop");
    }
}
