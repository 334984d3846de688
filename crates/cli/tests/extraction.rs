use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(root: &Path, args: &[&str]) -> Value {
    let output = Command::cargo_bin("codeintel")
        .expect("binary")
        .current_dir(root)
        .arg("--quiet")
        .args(args)
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "codeintel {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json on stdout")
}

#[test]
fn signatures_strip_typescript_annotations() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("util.ts"),
        "export function pad(value: number, width: number = 2): string {\n  return String(value).padStart(width, '0');\n}\n",
    )
    .unwrap();

    let result = run(temp.path(), &["signatures", "util.ts"]);
    assert_eq!(result["language"], "typescript");
    assert!(result.get("error").is_none());
    assert_eq!(result["signatures"][0]["name"], "pad");
    assert_eq!(result["signatures"][0]["kind"], "function");
    assert_eq!(result["signatures"][0]["params"][0], "value");
    assert_eq!(result["signatures"][0]["params"][1], "width");
    assert_eq!(result["signatures"][0]["line"], 1);
}

#[test]
fn signatures_for_missing_file_degrade() {
    let temp = tempdir().unwrap();
    let result = run(temp.path(), &["signatures", "gone.js"]);
    assert_eq!(result["error"], "file_not_found");
    assert_eq!(result["signatures"].as_array().unwrap().len(), 0);
}

#[test]
fn exports_classify_module_type() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("mixed.js"),
        "export const a = 1;\nmodule.exports.b = 2;\n",
    )
    .unwrap();

    let result = run(temp.path(), &["exports", "mixed.js"]);
    assert_eq!(result["module_type"], "mixed");
    assert_eq!(result["named"][0], "a");
    assert_eq!(result["cjs_exports"][0], "b");
}

#[test]
fn conventions_and_rules_from_an_analyzed_project() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src")).unwrap();
    for name in ["userService.js", "orderService.js", "apiClient.js"] {
        fs::write(root.join("src").join(name), "export const x = 1;\n").unwrap();
    }
    run(root, &["analyze"]);

    let conventions = run(root, &["conventions"]);
    assert_eq!(conventions["naming"]["overall"][0]["pattern"], "camelCase");
    assert_eq!(conventions["naming"]["overall"][0]["confidence"], 100);

    let rules = run(root, &["rules"]);
    assert!(rules["rule_count"].as_u64().unwrap() >= 1);
    let text = rules["rules_text"].as_str().unwrap();
    assert!(text.starts_with("1. "));
    assert!(text.contains("camelCase"));

    // Byte-identical on identical input.
    let again = run(root, &["rules"]);
    assert_eq!(again["rules_text"], rules["rules_text"]);
}
