//! Import/require dependency graph over snapshot files.
//!
//! [`DependencyGraphBuilder`] is the seam downstream consumers depend on;
//! [`ImportGraphBuilder`] is the default implementation, resolving relative
//! JS-family import specifiers against the snapshot's file set.

pub mod resolve;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use codeintel_signatures::imports::extract_import_specifiers;
use codeintel_snapshot::{languages, DependencyGraph, GraphStats, Snapshot};
use std::collections::BTreeMap;
use std::path::Path;

/// Builds forward and reverse import adjacency from file facts.
pub trait DependencyGraphBuilder {
    fn build(&self, root: &Path, snapshot: &Snapshot) -> Result<DependencyGraph>;
}

/// Default builder: scans JS-family files for import/require/export-from
/// specifiers and resolves relative ones to snapshot keys. Bare specifiers
/// (packages) and unresolvable paths are skipped; edges to files that later
/// disappear from the snapshot are tolerated downstream.
#[derive(Debug, Default)]
pub struct ImportGraphBuilder;

impl DependencyGraphBuilder for ImportGraphBuilder {
    fn build(&self, root: &Path, snapshot: &Snapshot) -> Result<DependencyGraph> {
        let mut forward: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut reverse: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut files_scanned = 0usize;
        let mut edge_count = 0usize;

        for (rel_path, record) in &snapshot.files {
            let is_js = record
                .language
                .as_deref()
                .is_some_and(languages::is_js_family);
            if !is_js {
                continue;
            }
            files_scanned += 1;

            let source = match std::fs::read_to_string(root.join(rel_path)) {
                Ok(source) => source,
                Err(err) => {
                    log::debug!("skipping {rel_path} while building graph: {err}");
                    continue;
                }
            };

            let mut targets = Vec::new();
            for spec in extract_import_specifiers(&source) {
                let Some(target) = resolve::resolve_specifier(rel_path, &spec, &snapshot.files)
                else {
                    continue;
                };
                if target != *rel_path && !targets.contains(&target) {
                    targets.push(target);
                }
            }
            if targets.is_empty() {
                continue;
            }

            targets.sort();
            edge_count += targets.len();
            for target in &targets {
                let importers = reverse.entry(target.clone()).or_default();
                if !importers.contains(rel_path) {
                    importers.push(rel_path.clone());
                }
            }
            forward.insert(rel_path.clone(), targets);
        }

        for importers in reverse.values_mut() {
            importers.sort();
        }

        let files_with_imports = forward.len();
        log::info!(
            "dependency graph: {files_scanned} files scanned, {files_with_imports} with imports, {edge_count} edges"
        );

        Ok(DependencyGraph {
            forward,
            reverse,
            stats: GraphStats {
                files_scanned,
                files_with_imports,
                edge_count,
            },
            built_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_snapshot::FileRecord;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn record(language: &str) -> FileRecord {
        FileRecord {
            language: Some(language.to_string()),
            size_bytes: 1,
            lines: 1,
            last_modified: String::new(),
        }
    }

    #[test]
    fn builds_forward_and_reverse_adjacency() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/a.js"), "import { b } from './b';\n").unwrap();
        std::fs::write(root.join("src/b.js"), "export const b = 1;\n").unwrap();

        let mut snapshot = Snapshot::empty();
        snapshot
            .files
            .insert("src/a.js".to_string(), record("javascript"));
        snapshot
            .files
            .insert("src/b.js".to_string(), record("javascript"));

        let graph = ImportGraphBuilder.build(root, &snapshot).unwrap();
        assert_eq!(graph.forward["src/a.js"], vec!["src/b.js"]);
        assert_eq!(graph.reverse["src/b.js"], vec!["src/a.js"]);
        assert_eq!(graph.stats.files_scanned, 2);
        assert_eq!(graph.stats.files_with_imports, 1);
        assert_eq!(graph.stats.edge_count, 1);
        assert!(!graph.built_at.is_empty());
    }

    #[test]
    fn bare_and_unresolvable_specifiers_are_skipped() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::write(
            root.join("main.js"),
            "import fs from 'fs';\nimport gone from './missing';\n",
        )
        .unwrap();

        let mut snapshot = Snapshot::empty();
        snapshot
            .files
            .insert("main.js".to_string(), record("javascript"));

        let graph = ImportGraphBuilder.build(root, &snapshot).unwrap();
        assert!(graph.forward.is_empty());
        assert_eq!(graph.stats.edge_count, 0);
    }

    #[test]
    fn non_js_files_are_not_scanned() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::write(root.join("lib.rs"), "use std::fs;\n").unwrap();

        let mut snapshot = Snapshot::empty();
        snapshot.files.insert("lib.rs".to_string(), record("rust"));

        let graph = ImportGraphBuilder.build(root, &snapshot).unwrap();
        assert_eq!(graph.stats.files_scanned, 0);
    }
}
