//! Per-agent-role result scoping.
//!
//! Each role declares the top-level fields it needs; scoping filters an
//! arbitrary JSON result down to those fields and reports the reduction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

struct RoleManifest {
    role: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
}

static MANIFESTS: &[RoleManifest] = &[
    RoleManifest {
        role: "planner",
        required: &["task_files", "stats"],
        optional: &["context_files", "conventions"],
    },
    RoleManifest {
        role: "implementer",
        required: &["task_files", "context_files"],
        optional: &["stats", "dependencies", "conventions"],
    },
    RoleManifest {
        role: "reviewer",
        required: &["task_files"],
        optional: &["context_files", "stats"],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopedResult {
    pub data: Value,
    pub keys_before: usize,
    pub keys_after: usize,
    pub reduction_pct: u8,
}

/// Filter `result` down to the keys the role's manifest allows. Required
/// fields are always present, as `null` when the input lacks them. Unknown
/// roles return `None`.
pub fn scope_result(role: &str, result: &Value) -> Option<ScopedResult> {
    let manifest = MANIFESTS.iter().find(|m| m.role == role)?;

    let input = result.as_object().cloned().unwrap_or_default();
    let keys_before = input.len();

    let mut output = Map::new();
    for key in manifest.required {
        let value = input.get(*key).cloned().unwrap_or(Value::Null);
        output.insert((*key).to_string(), value);
    }
    for key in manifest.optional {
        if let Some(value) = input.get(*key) {
            output.insert((*key).to_string(), value.clone());
        }
    }

    let keys_after = output.len();
    let reduction_pct = if keys_before == 0 || keys_after >= keys_before {
        0
    } else {
        (((keys_before - keys_after) * 100) / keys_before) as u8
    };

    Some(ScopedResult {
        data: Value::Object(output),
        keys_before,
        keys_after,
        reduction_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn keeps_required_fields_even_when_missing() {
        let scoped = scope_result("planner", &json!({"noise": 1})).unwrap();
        assert_eq!(scoped.data["task_files"], Value::Null);
        assert_eq!(scoped.data["stats"], Value::Null);
        assert!(scoped.data.get("noise").is_none());
    }

    #[test]
    fn drops_fields_outside_the_manifest() {
        let result = json!({
            "task_files": ["a.js"],
            "context_files": [],
            "stats": {"files_included": 1},
            "internal_debug": {"huge": true},
            "raw_source": "…",
        });
        let scoped = scope_result("reviewer", &result).unwrap();
        assert_eq!(scoped.keys_before, 5);
        assert_eq!(scoped.keys_after, 3);
        assert_eq!(scoped.reduction_pct, 40);
        assert!(scoped.data.get("internal_debug").is_none());
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(scope_result("stranger", &json!({})).is_none());
    }
}
