//! Shared test utilities for the attest workspace.
//!
//! This crate exists because `xtask` needs `normalize_nondeterministic` at
//! runtime (not behind `#[cfg(test)]`).

use serde_json::{Map, Value};

pub const TIMESTAMP: &str = "__TIMESTAMP__";
pub const VERSION: &str = "__VERSION__";

/// Normalize non-deterministic claim fields for golden-file comparison.
///
/// Only applies when the root looks like a claim document (`{"claim": {...}}`):
///
/// 1. `claim.versions.tool` and `claim.versions.toolGitCommit` become `"__VERSION__"`.
/// 2. `startTime`/`endTime` in `claim.metadata` and in every `claim.results`
///    entry become `"__TIMESTAMP__"`; result `duration` becomes `0`.
///
/// `rawResults`, `configurations` and `nodes` are never touched; they hold
/// external payloads that may legitimately carry the same key names.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(claim) = value.get_mut("claim").and_then(Value::as_object_mut) else {
        return value;
    };

    if let Some(versions) = claim.get_mut("versions").and_then(Value::as_object_mut) {
        for key in ["tool", "toolGitCommit"] {
            if versions.contains_key(key) {
                versions.insert(key.to_string(), Value::String(VERSION.to_string()));
            }
        }
    }

    if let Some(metadata) = claim.get_mut("metadata").and_then(Value::as_object_mut) {
        mask_times(metadata);
    }

    if let Some(results) = claim.get_mut("results").and_then(Value::as_object_mut) {
        for result in results.values_mut() {
            if let Some(obj) = result.as_object_mut() {
                mask_times(obj);
                if obj.contains_key("duration") {
                    obj.insert("duration".to_string(), Value::Number(0.into()));
                }
            }
        }
    }

    value
}

fn mask_times(obj: &mut Map<String, Value>) {
    for key in ["startTime", "endTime"] {
        if obj.contains_key(key) {
            obj.insert(key.to_string(), Value::String(TIMESTAMP.to_string()));
        }
    }
}
