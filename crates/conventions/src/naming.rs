//! File-name pattern classification and aggregation.

use codeintel_snapshot::{DirectoryNaming, NamingConventions, NamingPattern, Snapshot};
use std::collections::BTreeMap;

/// Classify an extension-stripped basename into a naming pattern.
///
/// Single-word names (no separators, no case transitions) carry no signal and
/// return `None`; multi-token names that fit no pattern classify as "mixed".
pub fn classify_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return None;
    }
    let has_underscore = name.contains('_');
    let has_hyphen = name.contains('-');
    let has_upper = name.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
    let has_transition = name
        .as_bytes()
        .windows(2)
        .any(|w| w[0].is_ascii_lowercase() && w[1].is_ascii_uppercase());
    let has_other_separator = name
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && c != '_' && c != '-');

    if !has_underscore && !has_hyphen && !has_other_separator && !has_transition {
        return None;
    }
    if has_other_separator {
        return Some("mixed");
    }

    match (has_underscore, has_hyphen) {
        (true, false) if !has_lower => Some("UPPER_SNAKE_CASE"),
        (true, false) if !has_upper => Some("snake_case"),
        (false, true) if !has_upper => Some("kebab-case"),
        (false, false) if name.starts_with(|c: char| c.is_ascii_lowercase()) => Some("camelCase"),
        (false, false) if name.starts_with(|c: char| c.is_ascii_uppercase()) => Some("PascalCase"),
        _ => Some("mixed"),
    }
}

fn stem(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Mine overall and per-directory naming patterns from the snapshot's files.
/// Only files with a recognized language participate.
pub fn mine_naming(snapshot: &Snapshot) -> NamingConventions {
    let mut overall: BTreeMap<&'static str, (usize, Vec<String>)> = BTreeMap::new();
    let mut per_dir: BTreeMap<String, BTreeMap<&'static str, usize>> = BTreeMap::new();
    let mut classified_total = 0usize;

    for (path, record) in &snapshot.files {
        if record.language.is_none() {
            continue;
        }
        let name = stem(path);
        let Some(pattern) = classify_name(name) else {
            continue;
        };
        classified_total += 1;

        let entry = overall.entry(pattern).or_default();
        entry.0 += 1;
        if entry.1.len() < 3 {
            entry.1.push(name.to_string());
        }
        *per_dir
            .entry(dirname(path).to_string())
            .or_default()
            .entry(pattern)
            .or_default() += 1;
    }

    let mut overall: Vec<NamingPattern> = overall
        .into_iter()
        .map(|(pattern, (count, examples))| NamingPattern {
            pattern: pattern.to_string(),
            confidence: percentage(count, classified_total),
            file_count: count,
            examples,
        })
        .collect();
    overall.sort_by(|a, b| b.file_count.cmp(&a.file_count).then(a.pattern.cmp(&b.pattern)));

    let by_directory: Vec<DirectoryNaming> = per_dir
        .into_iter()
        .filter_map(|(directory, counts)| {
            let total: usize = counts.values().sum();
            if total < 2 {
                return None;
            }
            let (dominant, count) = counts
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))?;
            Some(DirectoryNaming {
                directory,
                dominant: dominant.to_string(),
                confidence: percentage(count, total),
                file_count: total,
            })
        })
        .collect();

    NamingConventions {
        overall,
        by_directory,
    }
}

pub(crate) fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count * 100) / total).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_snapshot::FileRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_the_fixed_pattern_set() {
        assert_eq!(classify_name("userService"), Some("camelCase"));
        assert_eq!(classify_name("UserService"), Some("PascalCase"));
        assert_eq!(classify_name("user_service"), Some("snake_case"));
        assert_eq!(classify_name("user-service"), Some("kebab-case"));
        assert_eq!(classify_name("MAX_RETRIES"), Some("UPPER_SNAKE_CASE"));
    }

    #[test]
    fn single_word_names_are_uninformative() {
        assert_eq!(classify_name("main"), None);
        assert_eq!(classify_name("App"), None);
        assert_eq!(classify_name("API"), None);
    }

    #[test]
    fn inconsistent_names_classify_as_mixed() {
        assert_eq!(classify_name("user_Service-impl"), Some("mixed"));
        assert_eq!(classify_name("user.service"), Some("mixed"));
    }

    fn snapshot_with(paths: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        for path in paths {
            snapshot.files.insert(
                path.to_string(),
                FileRecord {
                    language: Some("javascript".to_string()),
                    size_bytes: 1,
                    lines: 1,
                    last_modified: String::new(),
                },
            );
        }
        snapshot
    }

    #[test]
    fn overall_confidence_is_share_of_classified_files() {
        let snapshot = snapshot_with(&[
            "src/userService.js",
            "src/orderService.js",
            "src/apiClient.js",
            "src/user-card.js",
            "src/main.js",
        ]);
        let naming = mine_naming(&snapshot);
        assert_eq!(naming.overall[0].pattern, "camelCase");
        assert_eq!(naming.overall[0].file_count, 3);
        assert_eq!(naming.overall[0].confidence, 75);
        assert_eq!(naming.overall[0].examples.len(), 3);
    }

    #[test]
    fn directories_with_thin_signal_are_skipped() {
        let snapshot = snapshot_with(&[
            "src/userService.js",
            "src/orderService.js",
            "lib/lone-file.js",
        ]);
        let naming = mine_naming(&snapshot);
        assert_eq!(naming.by_directory.len(), 1);
        assert_eq!(naming.by_directory[0].directory, "src");
        assert_eq!(naming.by_directory[0].dominant, "camelCase");
        assert_eq!(naming.by_directory[0].confidence, 100);
    }
}
