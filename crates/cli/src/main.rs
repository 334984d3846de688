use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use codeintel_context::{build_task_context, scope_result, ContextOptions};
use codeintel_conventions::{extract_conventions, generate_rules, ConventionOptions, RuleOptions};
use codeintel_graph::{DependencyGraphBuilder, ImportGraphBuilder};
use codeintel_scan::{analyze, check_staleness, ScanOptions};
use codeintel_signatures::{extract_exports, extract_signatures};
use codeintel_snapshot::{IntelStore, Snapshot, StaleReason};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "codeintel")]
#[command(about = "Incremental codebase intelligence for AI agents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root to operate on
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the project and persist a fresh snapshot
    Analyze(AnalyzeArgs),

    /// Report whether the persisted snapshot is stale and why
    Staleness,

    /// Print the persisted snapshot
    Snapshot,

    /// Extract function/class signatures from one file
    Signatures(FileArgs),

    /// Extract the export surface of one file
    Exports(FileArgs),

    /// Build the import dependency graph and persist it on the snapshot
    Graph,

    /// Mine naming/organization/framework conventions
    Conventions(ConventionArgs),

    /// Render mined conventions as a capped, ranked rule list
    Rules(RuleArgs),

    /// Build a token-budgeted context slice around task files
    #[command(name = "task-context")]
    TaskContext(TaskContextArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Reuse the persisted snapshot and rescan only changed files
    #[arg(long)]
    incremental: bool,
}

#[derive(Args)]
struct FileArgs {
    /// File to extract from, relative to the project root
    file: PathBuf,
}

#[derive(Args)]
struct ConventionArgs {
    /// Drop sub-results below this confidence
    #[arg(long, default_value_t = 60)]
    min_confidence: u8,

    /// Keep every sub-result regardless of confidence
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
struct RuleArgs {
    /// Drop rules below this confidence
    #[arg(long, default_value_t = 60)]
    min_confidence: u8,

    /// Maximum number of rules to emit
    #[arg(long, default_value_t = 20)]
    max_rules: usize,
}

#[derive(Args)]
struct TaskContextArgs {
    /// Files the task is about (repeatable)
    #[arg(long = "task-file", required = true)]
    task_files: Vec<String>,

    /// Plan files that should weigh into scoring (repeatable)
    #[arg(long = "plan-file")]
    plan_files: Vec<String>,

    /// Token budget for the serialized context list
    #[arg(long, default_value_t = 3000)]
    budget: usize,

    /// Skip attaching compact signatures to context entries
    #[arg(long)]
    no_signatures: bool,

    /// Scope the output to an agent role's field manifest
    #[arg(long)]
    role: Option<String>,
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

/// Summary printed after a scan; the full snapshot goes to disk, not stdout.
#[derive(Serialize)]
struct AnalyzeSummary<'a> {
    generated_at: &'a Option<String>,
    git_commit_hash: &'a Option<String>,
    source_dirs: &'a [String],
    languages: &'a std::collections::BTreeMap<String, codeintel_snapshot::LanguageStats>,
    stats: &'a codeintel_snapshot::SnapshotStats,
    incremental: bool,
}

fn require_snapshot(store: &IntelStore, root: &Path) -> Result<Arc<Snapshot>> {
    store
        .read(root)
        .context("failed to read snapshot")?
        .ok_or_else(|| anyhow!("no snapshot found for {}; run analyze first", root.display()))
}

fn run_analyze(root: &Path, args: &AnalyzeArgs) -> Result<()> {
    let store = IntelStore::new();
    let previous = store.read(root).context("failed to read snapshot")?;

    // Incremental mode needs a prior snapshot and a concrete changed-file
    // list; anything else falls back to a full scan.
    let opts = if args.incremental {
        match previous.as_deref() {
            Some(prev) => {
                let report = check_staleness(root, Some(prev));
                match report.reason {
                    None | Some(StaleReason::FilesChanged) | Some(StaleReason::MtimeNewer) => {
                        ScanOptions {
                            incremental: true,
                            previous: Some(prev.clone()),
                            changed_files: report.changed_files,
                        }
                    }
                    Some(reason) => {
                        log::info!("falling back to full scan: {reason:?}");
                        ScanOptions::default()
                    }
                }
            }
            None => {
                log::info!("no prior snapshot, running a full scan");
                ScanOptions::default()
            }
        }
    } else {
        ScanOptions::default()
    };

    let incremental = opts.incremental;
    let snapshot = analyze(root, opts);
    store.write(root, &snapshot)?;

    print_json(&AnalyzeSummary {
        generated_at: &snapshot.generated_at,
        git_commit_hash: &snapshot.git_commit_hash,
        source_dirs: &snapshot.source_dirs,
        languages: &snapshot.languages,
        stats: &snapshot.stats,
        incremental,
    })
}

fn run_graph(root: &Path) -> Result<()> {
    let store = IntelStore::new();
    let snapshot = require_snapshot(&store, root)?;

    let graph = ImportGraphBuilder.build(root, &snapshot)?;
    let mut updated = (*snapshot).clone();
    updated.dependencies = Some(graph.clone());
    store.write(root, &updated)?;

    print_json(&graph)
}

fn run_conventions(root: &Path, args: &ConventionArgs) -> Result<()> {
    let store = IntelStore::new();
    let snapshot = require_snapshot(&store, root)?;

    let opts = ConventionOptions {
        min_confidence: args.min_confidence,
        include_all: args.all,
    };
    let conventions = extract_conventions(root, &snapshot, &opts);
    let mut updated = (*snapshot).clone();
    updated.conventions = Some(conventions.clone());
    store.write(root, &updated)?;

    print_json(&conventions)
}

fn run_rules(root: &Path, args: &RuleArgs) -> Result<()> {
    let store = IntelStore::new();
    let snapshot = require_snapshot(&store, root)?;

    // Prefer conventions already persisted on the snapshot; mine fresh ones
    // (unfiltered, so the rule threshold decides) otherwise.
    let conventions = match &snapshot.conventions {
        Some(conventions) => conventions.clone(),
        None => extract_conventions(
            root,
            &snapshot,
            &ConventionOptions {
                min_confidence: 0,
                include_all: true,
            },
        ),
    };
    let rules = generate_rules(
        &conventions,
        &RuleOptions {
            min_confidence: args.min_confidence,
            max_rules: args.max_rules,
        },
    );
    print_json(&rules)
}

fn run_task_context(root: &Path, args: &TaskContextArgs) -> Result<()> {
    let opts = ContextOptions {
        plan_files: args.plan_files.clone(),
        token_budget: args.budget,
        include_signatures: !args.no_signatures,
    };
    let context = build_task_context(root, &args.task_files, &opts)?;

    match &args.role {
        Some(role) => {
            let value = serde_json::to_value(&context)?;
            let scoped = scope_result(role, &value)
                .ok_or_else(|| anyhow!("unknown agent role: {role}"))?;
            print_json(&scoped)
        }
        None => print_json(&context),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let root = &cli.root;
    match &cli.command {
        Commands::Analyze(args) => run_analyze(root, args),
        Commands::Staleness => {
            let store = IntelStore::new();
            let snapshot = store.read(root).context("failed to read snapshot")?;
            let report = check_staleness(root, snapshot.as_deref());
            print_json(&report)
        }
        Commands::Snapshot => {
            let store = IntelStore::new();
            let snapshot = require_snapshot(&store, root)?;
            print_json(snapshot.as_ref())
        }
        Commands::Signatures(args) => print_json(&extract_signatures(&root.join(&args.file), None)),
        Commands::Exports(args) => print_json(&extract_exports(&root.join(&args.file))),
        Commands::Graph => run_graph(root),
        Commands::Conventions(args) => run_conventions(root, args),
        Commands::Rules(args) => run_rules(root, args),
        Commands::TaskContext(args) => run_task_context(root, args),
    }
}
