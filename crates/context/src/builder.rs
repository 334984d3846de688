//! Token-budgeted, relevance-ranked task context.

use crate::estimator::{default_estimator, estimate_json};
use anyhow::{bail, Context, Result};
use codeintel_graph::{DependencyGraphBuilder, ImportGraphBuilder};
use codeintel_scan::git;
use codeintel_signatures::extract_signatures;
use codeintel_snapshot::{DependencyGraph, IntelStore, SignatureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const DEFAULT_TOKEN_BUDGET: usize = 3000;
const MIN_SCORE: f64 = 0.3;
const RECENT_COMMIT_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub plan_files: Vec<String>,
    pub token_budget: usize,
    pub include_signatures: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            plan_files: Vec::new(),
            token_budget: DEFAULT_TOKEN_BUDGET,
            include_signatures: true,
        }
    }
}

/// Compact signature attached to context entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactSignature {
    pub name: String,
    pub kind: SignatureKind,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFile {
    pub path: String,
    pub score: f64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<CompactSignature>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextStats {
    pub candidates_found: usize,
    pub files_included: usize,
    pub files_excluded: usize,
    pub token_estimate: usize,
    pub reduction_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskContext {
    pub task_files: Vec<String>,
    pub context_files: Vec<ContextFile>,
    pub stats: ContextStats,
}

/// Build a ranked, budgeted context slice around the given task files.
///
/// The only hard failure is an absent snapshot; everything else degrades:
/// a missing dependency graph is built on the fly, git failures yield an
/// empty recent set, signature extraction failures are swallowed.
pub fn build_task_context(
    root: &Path,
    task_files: &[String],
    opts: &ContextOptions,
) -> Result<TaskContext> {
    let store = IntelStore::new();
    let snapshot = store
        .read(root)
        .context("failed to read snapshot")?
        .ok_or_else(|| {
            anyhow::anyhow!("no snapshot found for {}; run analyze first", root.display())
        })?;
    if task_files.is_empty() {
        bail!("task_files must not be empty");
    }

    let graph: DependencyGraph = match &snapshot.dependencies {
        Some(graph) => graph.clone(),
        None => ImportGraphBuilder.build(root, &snapshot)?,
    };

    // One-hop expansion around the task files.
    let mut candidates: BTreeSet<String> = task_files.iter().cloned().collect();
    for task in task_files {
        if let Some(imports) = graph.forward.get(task) {
            candidates.extend(imports.iter().cloned());
        }
        if let Some(importers) = graph.reverse.get(task) {
            candidates.extend(importers.iter().cloned());
        }
    }
    let candidates_found = candidates.len();

    let recent = git::recent_files(root, RECENT_COMMIT_COUNT);

    let mut scored: Vec<ContextFile> = Vec::new();
    for path in candidates {
        let (score, reason) = score_candidate(&path, task_files, &opts.plan_files, &graph, &recent);
        if score < MIN_SCORE {
            continue;
        }
        let signatures = if opts.include_signatures && score < 1.0 {
            compact_signatures(root, &path)
        } else {
            None
        };
        scored.push(ContextFile {
            path,
            score,
            reason,
            signatures,
        });
    }
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });

    // Trim the lowest-scored entries until the serialized list fits.
    let estimator = default_estimator();
    let mut token_estimate = estimate_json(estimator.as_ref(), &scored);
    while token_estimate > opts.token_budget && scored.len() > 1 {
        let dropped = scored.pop();
        if let Some(dropped) = &dropped {
            log::debug!("dropping {} to fit the token budget", dropped.path);
        }
        token_estimate = estimate_json(estimator.as_ref(), &scored);
    }

    let files_included = scored.len();
    let files_excluded = candidates_found.saturating_sub(files_included);
    let reduction_pct = if candidates_found == 0 {
        0
    } else {
        ((files_excluded * 100) / candidates_found) as u8
    };

    Ok(TaskContext {
        task_files: task_files.to_vec(),
        context_files: scored,
        stats: ContextStats {
            candidates_found,
            files_included,
            files_excluded,
            token_estimate,
            reduction_pct,
        },
    })
}

/// Score one candidate. Exact task-file membership short-circuits at 1.0;
/// the remaining signals accumulate in priority order and clamp to [0, 1].
fn score_candidate(
    path: &str,
    task_files: &[String],
    plan_files: &[String],
    graph: &DependencyGraph,
    recent: &std::collections::HashSet<String>,
) -> (f64, String) {
    if task_files.iter().any(|t| t == path) {
        return (1.0, "task file".to_string());
    }

    let mut score: f64 = 0.0;
    let mut reasons: Vec<&str> = Vec::new();

    // First importing task file wins; no stacking across task files.
    let imported_by_task = task_files.iter().any(|task| {
        graph
            .forward
            .get(task)
            .is_some_and(|imports| imports.iter().any(|i| i == path))
    });
    if imported_by_task {
        score += 0.7;
        reasons.push("imported by task file");
    }
    let imports_task = graph
        .forward
        .get(path)
        .is_some_and(|imports| imports.iter().any(|i| task_files.contains(i)));
    if imports_task {
        score += 0.5;
        reasons.push("imports task file");
    }
    if plan_files.iter().any(|p| p == path) {
        score += 0.3;
        reasons.push("plan file");
    }
    if recent.contains(path) {
        score += 0.2;
        reasons.push("recently changed");
    }

    (score.min(1.0), reasons.join(", "))
}

/// Best-effort compact signatures; extraction errors are swallowed.
fn compact_signatures(root: &Path, rel_path: &str) -> Option<Vec<CompactSignature>> {
    let result = extract_signatures(&root.join(rel_path), None);
    if result.signatures.is_empty() {
        return None;
    }
    Some(
        result
            .signatures
            .into_iter()
            .map(|sig| CompactSignature {
                name: sig.name,
                kind: sig.kind,
                params: sig.params,
            })
            .collect(),
    )
}
