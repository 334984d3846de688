//! Import-specifier extraction for JS-family sources, feeding the
//! dependency-graph builder.

use crate::exports::strip_line_comments;
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+[\w$*{},\s]+?\s+from\s+["']([^"']+)["']"#).expect("import regex")
});
static IMPORT_BARE: Lazy<Regex> = Lazy::new(|| {
    // side-effect imports and dynamic import()
    Regex::new(r#"import\s*\(?\s*["']([^"']+)["']"#).expect("bare import regex")
});
static REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*["']([^"']+)["']\s*\)"#).expect("require regex"));
static EXPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"export\s+(?:\*|\{[^}]*\}|[\w$]+)\s+from\s+["']([^"']+)["']"#)
        .expect("export-from regex")
});

/// All module specifiers a source file references, de-duplicated first-seen.
/// Line comments are stripped first so commented-out imports do not count.
pub fn extract_import_specifiers(source: &str) -> Vec<String> {
    let stripped = strip_line_comments(source);
    let mut out: Vec<String> = Vec::new();
    let mut push = |spec: &str| {
        if !out.iter().any(|s| s == spec) {
            out.push(spec.to_string());
        }
    };

    for re in [&*IMPORT_FROM, &*IMPORT_BARE, &*REQUIRE, &*EXPORT_FROM] {
        for caps in re.captures_iter(&stripped) {
            push(&caps[1]);
        }
    }
    out
}
