//! Jenkins: each pipeline stage is one canonical step. The stage's shell
//! lines stay nested under `steps`, where the secrets heuristic still scans
//! them.

use serde_json::Value;

pub fn steps(doc: &Value) -> Option<Vec<Value>> {
    let stages = doc.get("stages")?.as_array()?;
    let out: Vec<Value> = stages.iter().filter(|s| s.is_object()).cloned().collect();
    (!out.is_empty()).then_some(out)
}
