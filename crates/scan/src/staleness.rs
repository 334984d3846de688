//! Two-tier staleness decision: git commit comparison first, mtime watermark
//! as the fallback when no hash is recorded or no repository is present.

use crate::{git, walker};
use chrono::{DateTime, Utc};
use codeintel_snapshot::{Snapshot, StaleReason, StalenessReport};
use std::path::Path;

/// Decide whether a persisted snapshot still reflects the working tree.
pub fn check_staleness(root: &Path, snapshot: Option<&Snapshot>) -> StalenessReport {
    let Some(snapshot) = snapshot else {
        return StalenessReport::stale(StaleReason::NoIntel, Vec::new());
    };

    if let Some(recorded) = snapshot.git_commit_hash.as_deref() {
        if let Some(head) = git::head_commit(root) {
            return check_git(root, recorded, &head);
        }
        // Repository gone or git unavailable: degrade to the mtime tier.
        log::debug!("Snapshot records a commit but HEAD is unavailable; falling back to mtimes");
    }

    check_mtimes(root, snapshot)
}

fn check_git(root: &Path, recorded: &str, head: &str) -> StalenessReport {
    if recorded == head {
        return StalenessReport::fresh();
    }

    match git::changed_between(root, recorded, head) {
        // The recorded commit can no longer be diffed (e.g. rewritten away by
        // a rebase): signal that a full rescan is required.
        None => StalenessReport::stale(StaleReason::CommitMissing, Vec::new()),
        // HEAD moved without touching any path (empty commits).
        Some(changed) if changed.is_empty() => StalenessReport::fresh(),
        Some(changed) => StalenessReport::stale(StaleReason::FilesChanged, changed),
    }
}

fn check_mtimes(root: &Path, snapshot: &Snapshot) -> StalenessReport {
    let Some(watermark) = snapshot
        .generated_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(DateTime::<Utc>::from)
    else {
        return StalenessReport::stale(StaleReason::NoWatermark, Vec::new());
    };

    let mut changed = Vec::new();

    let source_dirs = if snapshot.source_dirs.is_empty() {
        walker::discover_source_dirs(root)
    } else {
        snapshot.source_dirs.clone()
    };

    for rel_path in walker::collect_source_files(root, &source_dirs) {
        let path = root.join(&rel_path);
        let newer = match std::fs::metadata(&path).and_then(|meta| meta.modified()) {
            Ok(mtime) => DateTime::<Utc>::from(mtime) > watermark,
            // A file that fails to stat mid-check is treated as
            // deleted-then-changed.
            Err(_) => true,
        };
        if newer {
            changed.push(rel_path);
        }
    }

    for rel_path in snapshot.files.keys() {
        if !root.join(rel_path).exists() && !changed.contains(rel_path) {
            changed.push(rel_path.clone());
        }
    }

    if changed.is_empty() {
        StalenessReport::fresh()
    } else {
        changed.sort();
        StalenessReport::stale(StaleReason::MtimeNewer, changed)
    }
}
