//! Full and incremental snapshot construction.

use crate::{analyzer, git, walker};
use codeintel_snapshot::{
    languages, FileRecord, LanguageStats, Snapshot, SnapshotStats, SNAPSHOT_SCHEMA_VERSION,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// How a scan should run
#[derive(Debug, Default)]
pub struct ScanOptions {
    /// Merge changed files into a prior snapshot instead of rescanning
    pub incremental: bool,
    /// Prior snapshot, required for incremental mode
    pub previous: Option<Snapshot>,
    /// Paths (relative to root) known to have changed since the prior snapshot
    pub changed_files: Vec<String>,
}

/// Build a snapshot of a project.
///
/// Full mode walks every source directory and analyzes every file fresh,
/// discarding the prior map entirely. Incremental mode merges the changed
/// files into a copy of the prior file map. Either way the snapshot is
/// stamped with a fresh watermark, the current commit hash and branch, the
/// directory list used, and the elapsed duration, and its `languages` and
/// `stats` sections are recomputed in full.
pub fn analyze(root: &Path, opts: ScanOptions) -> Snapshot {
    let started = Instant::now();
    let source_dirs = walker::discover_source_dirs(root);

    let files = match (opts.incremental, opts.previous) {
        (true, Some(previous)) => merge_incremental(root, previous, &opts.changed_files),
        _ => scan_full(root, &source_dirs),
    };

    let (language_stats, mut stats) = recompute_aggregates(&files);
    stats.scan_duration_ms = started.elapsed().as_millis() as u64;

    Snapshot {
        version: SNAPSHOT_SCHEMA_VERSION,
        generated_at: Some(analyzer::now_timestamp()),
        git_commit_hash: git::head_commit(root),
        git_branch: git::current_branch(root),
        source_dirs,
        languages: language_stats,
        files,
        dependencies: None,
        conventions: None,
        stats,
    }
}

fn scan_full(root: &Path, source_dirs: &[String]) -> BTreeMap<String, FileRecord> {
    let mut files = BTreeMap::new();
    for rel_path in walker::collect_source_files(root, source_dirs) {
        let record = analyzer::analyze_file(root, &rel_path);
        files.insert(rel_path, record);
    }
    log::info!("Full scan analyzed {} files", files.len());
    files
}

/// Merge a changed-file list into a copy of the prior file map.
///
/// The removal pass stats every previously known file independently of the
/// changed list, since diffs can miss renames and deletions in edge cases.
fn merge_incremental(
    root: &Path,
    previous: Snapshot,
    changed_files: &[String],
) -> BTreeMap<String, FileRecord> {
    let mut files = previous.files;

    let known: Vec<String> = files.keys().cloned().collect();
    for rel_path in known {
        if !root.join(&rel_path).exists() {
            log::debug!("Removing deleted file {rel_path}");
            files.remove(&rel_path);
        }
    }

    for rel_path in changed_files {
        let path = root.join(rel_path);
        if path.is_file() && !languages::is_binary_path(&path) {
            let record = analyzer::analyze_file(root, rel_path);
            files.insert(rel_path.clone(), record);
        } else {
            files.remove(rel_path);
        }
    }

    log::info!(
        "Incremental scan merged {} changed files, {} total",
        changed_files.len(),
        files.len()
    );
    files
}

/// Recompute `languages` and `stats` in full from the file map. O(files) and
/// cheap, which keeps aggregates from drifting across incremental merges.
pub fn recompute_aggregates(
    files: &BTreeMap<String, FileRecord>,
) -> (BTreeMap<String, LanguageStats>, SnapshotStats) {
    let mut languages: BTreeMap<String, LanguageStats> = BTreeMap::new();
    let mut stats = SnapshotStats::default();

    for (path, record) in files {
        stats.total_files += 1;
        stats.total_lines += record.lines;
        stats.total_bytes += record.size_bytes;

        let Some(language) = &record.language else {
            continue;
        };
        let entry = languages.entry(language.clone()).or_default();
        entry.count += 1;
        entry.lines += record.lines;

        if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            if !entry.extensions.contains(&ext) {
                entry.extensions.push(ext);
                entry.extensions.sort();
            }
        }
    }

    (languages, stats)
}
