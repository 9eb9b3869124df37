//! Already-canonical input: a root-level `steps` array.

use serde_json::Value;

pub fn steps(doc: &Value) -> Option<Vec<Value>> {
    doc.get("steps")?.as_array().map(|a| a.to_vec())
}
