//! Shared step-field derivation.
//!
//! Every dialect funnels its raw step values through `normalize_step`, which
//! synthesizes anything missing. The keyword heuristics are intentionally
//! loose — a step merely named "key" will be flagged as touching secrets.

use serde_json::{Map, Value};

use driftwatch_core::types::run::{PipelineStep, StepType};

/// Keywords that mark a step as security-related.
pub const SECURITY_KEYWORDS: [&str; 16] = [
    "security", "scan", "audit", "test", "check", "verify", "validate",
    "dependency-check", "sast", "dast", "secrets", "token", "key",
    "vulnerability", "compliance", "policy",
];

/// Substrings that mark an env key, input key, name, or script body as
/// referencing credentials.
pub const SECRET_KEYWORDS: [&str; 3] = ["secret", "token", "key"];

/// Substrings that mark a step as a manual approval gate.
pub const APPROVAL_KEYWORDS: [&str; 4] = ["approval", "manual", "gate", "review"];

const NAME_KEYS: [&str; 7] = ["name", "id", "step", "action", "task", "label", "job"];
const ORDER_KEYS: [&str; 4] = ["executionOrder", "order", "index", "run_number"];
const STATUS_KEYS: [&str; 4] = ["status", "state", "result", "conclusion"];
const SCRIPT_KEYS: [&str; 3] = ["script", "run", "command"];
const PERMISSION_TOKENS: [&str; 3] = ["read", "write", "admin"];

/// Normalize one raw step value. `index` is the 0-based position in the run,
/// used for the synthetic name and the default execution order.
pub fn normalize_step(raw: &Value, index: usize) -> PipelineStep {
    let name = step_name(raw, index);
    let lower_name = name.to_lowercase();

    let permissions = collect_permissions(raw);
    let security = explicit_bool(raw, "security")
        .unwrap_or_else(|| contains_any(&lower_name, &SECURITY_KEYWORDS));
    let secrets = detect_secrets(raw, &lower_name);
    let approval = detect_approval(raw, &lower_name);
    let step_type = step_type(raw, &lower_name);

    PipelineStep {
        name,
        step_type,
        execution_order: execution_order(raw, index),
        status: string_field(raw, &STATUS_KEYS).unwrap_or_default(),
        permissions,
        security,
        secrets,
        approval,
    }
}

fn step_name(raw: &Value, index: usize) -> String {
    if let Some(s) = raw.as_str() {
        if !s.trim().is_empty() {
            return s.to_string();
        }
    }
    string_field(raw, &NAME_KEYS).unwrap_or_else(|| format!("step-{}", index + 1))
}

fn step_type(raw: &Value, lower_name: &str) -> StepType {
    if let Some(explicit) = string_field(raw, &["type", "category", "kind"]) {
        match explicit.to_lowercase().as_str() {
            "security" => return StepType::Security,
            "build" => return StepType::Build,
            "test" => return StepType::Test,
            "deploy" | "deployment" => return StepType::Deploy,
            "approval" => return StepType::Approval,
            "other" => return StepType::Other,
            _ => {}
        }
    }
    classify_name(lower_name)
}

/// Keyword classification. Precedence: approval, deploy, test, build,
/// security — the `security` *flag* is computed separately from the broader
/// keyword list, so "integration tests" stays `type=test` while still being
/// security-relevant.
fn classify_name(lower_name: &str) -> StepType {
    const APPROVAL: [&str; 5] = ["approval", "approve", "manual", "gate", "review"];
    const DEPLOY: [&str; 5] = ["deploy", "release", "publish", "rollout", "promote"];
    const TEST: [&str; 3] = ["test", "spec", "e2e"];
    const BUILD: [&str; 6] = ["build", "compile", "package", "docker", "image", "bundle"];
    const SECURITY: [&str; 9] = [
        "security", "scan", "audit", "sast", "dast", "vulnerability",
        "compliance", "policy", "secrets",
    ];

    if contains_any(lower_name, &APPROVAL) {
        StepType::Approval
    } else if contains_any(lower_name, &DEPLOY) {
        StepType::Deploy
    } else if contains_any(lower_name, &TEST) {
        StepType::Test
    } else if contains_any(lower_name, &BUILD) {
        StepType::Build
    } else if contains_any(lower_name, &SECURITY) {
        StepType::Security
    } else {
        StepType::Other
    }
}

fn execution_order(raw: &Value, index: usize) -> u32 {
    for key in ORDER_KEYS {
        if let Some(n) = raw.get(key).and_then(Value::as_u64) {
            if n >= 1 {
                return n.min(u32::MAX as u64) as u32;
            }
        }
    }
    (index + 1) as u32
}

/// Union the permission sources: an explicit array, a GitHub-style
/// `{perm: true}` object, a bare string, `scopes`/`access` lists, and
/// read/write/admin tokens inside env values. Deduplicated and sorted.
fn collect_permissions(raw: &Value) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for key in ["permissions", "scopes", "access"] {
        match raw.get(key) {
            Some(Value::Array(items)) => {
                found.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
            }
            Some(Value::Object(map)) => {
                // GitHub style: `{contents: true}` grants the key;
                // `{contents: "write"}` grants the level named by the value.
                for (perm, level) in map {
                    match level {
                        Value::Bool(true) => found.push(perm.clone()),
                        Value::String(s) if !s.is_empty() && s != "none" => {
                            found.push(s.clone());
                        }
                        _ => {}
                    }
                }
            }
            Some(Value::String(s)) if !s.is_empty() => found.push(s.clone()),
            _ => {}
        }
    }

    if let Some(env) = raw.get("env").and_then(Value::as_object) {
        for value in env.values() {
            if let Some(s) = value.as_str() {
                let lower = s.to_lowercase();
                for token in PERMISSION_TOKENS {
                    if lower.contains(token) {
                        found.push(token.to_string());
                    }
                }
            }
        }
    }

    found.sort();
    found.dedup();
    found
}

fn detect_secrets(raw: &Value, lower_name: &str) -> bool {
    if keys_contain(raw.get("env"), &["secret", "token", "key", "password"]) {
        return true;
    }
    if keys_contain(raw.get("inputs"), &SECRET_KEYWORDS) {
        return true;
    }
    if contains_any(lower_name, &SECRET_KEYWORDS) {
        return true;
    }
    for key in ["description", "id"] {
        if let Some(s) = raw.get(key).and_then(Value::as_str) {
            if contains_any(&s.to_lowercase(), &SECRET_KEYWORDS) {
                return true;
            }
        }
    }
    for key in SCRIPT_KEYS {
        if script_body_contains(raw.get(key), &SECRET_KEYWORDS) {
            return true;
        }
    }
    // Jenkins-style stages carry their shell lines in a nested steps array.
    script_body_contains(raw.get("steps"), &SECRET_KEYWORDS)
}

fn detect_approval(raw: &Value, lower_name: &str) -> bool {
    if let Some(t) = string_field(raw, &["type", "kind"]) {
        if t.eq_ignore_ascii_case("approval") {
            return true;
        }
        if contains_any(&t.to_lowercase(), &APPROVAL_KEYWORDS) {
            return true;
        }
    }
    // GitLab gates jobs behind `when: manual`.
    if raw.get("when").and_then(Value::as_str) == Some("manual") {
        return true;
    }
    if contains_any(lower_name, &APPROVAL_KEYWORDS) {
        return true;
    }
    for key in ["description", "id"] {
        if let Some(s) = raw.get(key).and_then(Value::as_str) {
            if contains_any(&s.to_lowercase(), &APPROVAL_KEYWORDS) {
                return true;
            }
        }
    }
    false
}

// ─── Helpers ───────────────────────────────────────────────────────────────

fn explicit_bool(raw: &Value, key: &str) -> Option<bool> {
    raw.get(key).and_then(Value::as_bool)
}

fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = raw.get(*key).and_then(Value::as_str) {
            if !s.trim().is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn keys_contain(value: Option<&Value>, needles: &[&str]) -> bool {
    value
        .and_then(Value::as_object)
        .is_some_and(|map: &Map<String, Value>| {
            map.keys()
                .any(|k| contains_any(&k.to_lowercase(), needles))
        })
}

/// Scan a script body (string, array of lines, or nested structure) for
/// keywords. Non-string shapes are serialized and scanned as text.
fn script_body_contains(value: Option<&Value>, needles: &[&str]) -> bool {
    match value {
        None => false,
        Some(Value::String(s)) => contains_any(&s.to_lowercase(), needles),
        Some(other) => serde_json::to_string(other)
            .map(|s| contains_any(&s.to_lowercase(), needles))
            .unwrap_or(false),
    }
}
