//! Uniform wrapper around the git command line.
//!
//! Every call site receives a `GitOutput` and branches on `exit_code`; a git
//! binary that is missing, times out at the OS level, or runs outside a
//! repository surfaces as a non-zero exit code, never as an error. Arguments
//! are always passed as an array, never through a shell.

use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

/// Result of one git invocation
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn ok(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run git with the given arguments against a project root.
pub fn run_git(root: &Path, args: &[&str]) -> GitOutput {
    let output = Command::new("git").arg("-C").arg(root).args(args).output();

    match output {
        Ok(out) => GitOutput {
            exit_code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        },
        Err(err) => {
            log::debug!("git {:?} failed to spawn: {err}", args);
            GitOutput {
                exit_code: -1,
                stdout: String::new(),
                stderr: err.to_string(),
            }
        }
    }
}

/// Current HEAD commit hash, or `None` outside a repository.
pub fn head_commit(root: &Path) -> Option<String> {
    let out = run_git(root, &["rev-parse", "HEAD"]);
    if !out.ok() {
        return None;
    }
    let hash = out.stdout.trim().to_string();
    if hash.is_empty() {
        None
    } else {
        Some(hash)
    }
}

/// Current branch name, or `None` outside a repository / on detached HEAD.
pub fn current_branch(root: &Path) -> Option<String> {
    let out = run_git(root, &["rev-parse", "--abbrev-ref", "HEAD"]);
    if !out.ok() {
        return None;
    }
    let branch = out.stdout.trim().to_string();
    if branch.is_empty() || branch == "HEAD" {
        None
    } else {
        Some(branch)
    }
}

/// Paths changed between two commits, or `None` when the diff itself fails
/// (e.g. the old commit no longer exists after a rebase).
pub fn changed_between(root: &Path, old: &str, new: &str) -> Option<Vec<String>> {
    let out = run_git(root, &["diff", "--name-only", old, new]);
    if !out.ok() {
        return None;
    }
    Some(
        out.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Whether git reports a path as ignored. Outside a repository nothing is
/// considered ignored.
pub fn is_ignored(root: &Path, rel_path: &str) -> bool {
    run_git(root, &["check-ignore", "-q", "--", rel_path]).exit_code == 0
}

/// Filenames touched by the last `count` non-merge commits. Best-effort: any
/// failure yields an empty set.
pub fn recent_files(root: &Path, count: usize) -> HashSet<String> {
    let limit = format!("-{count}");
    let out = run_git(
        root,
        &["log", &limit, "--no-merges", "--name-only", "--pretty=format:"],
    );
    if !out.ok() {
        return HashSet::new();
    }
    out.stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
