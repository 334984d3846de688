//! Relative import-specifier resolution against the snapshot's file keys.

use codeintel_snapshot::FileRecord;
use std::collections::BTreeMap;

const RESOLVE_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "mjs", "cjs"];

/// Resolve a specifier written in `importer` to a snapshot file key.
///
/// Only relative specifiers resolve; bare package names return `None`.
/// Candidates are tried in order: the exact path, the path with each known
/// extension appended, then `index.*` under the path as a directory.
pub fn resolve_specifier(
    importer: &str,
    spec: &str,
    files: &BTreeMap<String, FileRecord>,
) -> Option<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") {
        return None;
    }

    let dir = match importer.rfind('/') {
        Some(idx) => &importer[..idx],
        None => "",
    };
    let base = normalize(dir, spec)?;

    if files.contains_key(&base) {
        return Some(base);
    }
    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{base}.{ext}");
        if files.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    for ext in RESOLVE_EXTENSIONS {
        let candidate = format!("{base}/index.{ext}");
        if files.contains_key(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Join `spec` onto `dir` and collapse `.` and `..` segments. Returns `None`
/// when the specifier escapes the project root.
fn normalize(dir: &str, spec: &str) -> Option<String> {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in spec.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}
