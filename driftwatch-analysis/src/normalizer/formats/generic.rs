//! Generic extraction: recursive search for the largest array of step-like
//! objects, bounded at depth 5.

use serde_json::Value;

const MAX_DEPTH: usize = 5;
const STEP_LIKE_KEYS: [&str; 7] = ["name", "id", "step", "action", "script", "task", "label"];

/// Recursive search only — may return an empty list. Used as the fallback
/// when a dialect's expected shape is missing.
pub fn search_steps(doc: &Value) -> Vec<Value> {
    let mut best: Option<Vec<Value>> = None;
    search(doc, 0, &mut best);
    best.unwrap_or_default()
}

/// Full generic extraction: recursive search, then the whole document as a
/// single step if nothing step-shaped was found.
pub fn steps(doc: &Value) -> Vec<Value> {
    let found = search_steps(doc);
    if found.is_empty() {
        vec![doc.clone()]
    } else {
        found
    }
}

fn search(value: &Value, depth: usize, best: &mut Option<Vec<Value>>) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::Array(items) => {
            if is_step_array(items) && best.as_ref().map_or(true, |b| items.len() > b.len()) {
                *best = Some(items.clone());
            }
            for item in items {
                search(item, depth + 1, best);
            }
        }
        Value::Object(map) => {
            for nested in map.values() {
                search(nested, depth + 1, best);
            }
        }
        _ => {}
    }
}

fn is_step_array(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| {
            item.as_object()
                .is_some_and(|obj| STEP_LIKE_KEYS.iter().any(|k| obj.contains_key(*k)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_largest_nested_step_array() {
        let doc = json!({
            "meta": {"tags": [{"name": "small"}]},
            "payload": {"entries": [
                {"label": "fetch", "run": "curl"},
                {"label": "build", "run": "make"},
                {"label": "ship", "run": "scp"}
            ]}
        });
        let steps = search_steps(&doc);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["label"], "fetch");
    }

    #[test]
    fn ignores_arrays_of_non_step_objects() {
        let doc = json!({"numbers": [1, 2, 3], "things": [{"weight": 10}]});
        assert!(search_steps(&doc).is_empty());
        // Whole document becomes the single step.
        assert_eq!(steps(&doc).len(), 1);
    }

    #[test]
    fn respects_depth_limit() {
        let doc = json!({"a": {"b": {"c": {"d": {"e": {"f": {"g": [{"name": "deep"}]}}}}}}});
        assert!(search_steps(&doc).is_empty());
    }
}
