//! Shared data model for the codebase intelligence engine.
//!
//! One [`Snapshot`] exists per project. It is produced by a full or
//! incremental scan, persisted wholesale as a single JSON document, and
//! extended in place with lazily computed sections (dependency graph,
//! conventions) that are re-persisted alongside it.

pub mod error;
pub mod languages;
pub mod model;
pub mod store;

pub use error::{ExtractErrorCode, Result, SnapshotError, StaleReason, StalenessReport};
pub use model::{
    ConventionSet, DependencyGraph, DirectoryNaming, ExportSurface, FileOrganization, FileRecord,
    FrameworkConvention, FrameworkPattern, GraphStats, GroupingInfo, LanguageStats, ModuleType,
    NamingConventions, NamingPattern, PlacementInfo, ReExport, Signature, SignatureKind, Snapshot,
    SnapshotStats, StructureInfo, SNAPSHOT_SCHEMA_VERSION,
};
pub use store::{snapshot_path, IntelStore, SNAPSHOT_DIR, SNAPSHOT_FILE};
