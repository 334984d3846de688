//! Source-tree scanning: discovery, per-file analysis, staleness detection
//! and incremental snapshot merging.
//!
//! Everything here is synchronous and single-threaded; git runs as a blocking
//! subprocess through [`git::run_git`], which always returns a uniform
//! `{exit_code, stdout, stderr}` result instead of erroring.

pub mod analyzer;
pub mod git;
pub mod scan;
pub mod staleness;
pub mod walker;

pub use scan::{analyze, recompute_aggregates, ScanOptions};
pub use staleness::check_staleness;
pub use walker::{collect_source_files, discover_source_dirs, SourceWalker};
