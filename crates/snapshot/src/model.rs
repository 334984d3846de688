use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Persisted summary of a project's files, languages and derived sections.
///
/// Keys in `files` are paths relative to the project root. `languages` and
/// `stats` are always recomputed in full from `files`, never adjusted
/// incrementally, so aggregates cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    pub source_dirs: Vec<String>,
    pub languages: BTreeMap<String, LanguageStats>,
    pub files: BTreeMap<String, FileRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conventions: Option<ConventionSet>,
    pub stats: SnapshotStats,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_SCHEMA_VERSION,
            generated_at: None,
            git_commit_hash: None,
            git_branch: None,
            source_dirs: Vec::new(),
            languages: BTreeMap::new(),
            files: BTreeMap::new(),
            dependencies: None,
            conventions: None,
            stats: SnapshotStats::default(),
        }
    }
}

/// Per-language aggregate, recomputed in full on every scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub count: usize,
    pub lines: u64,
    pub extensions: Vec<String>,
}

/// Per-file facts collected by the analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub language: Option<String>,
    pub size_bytes: u64,
    pub lines: u64,
    pub last_modified: String,
}

impl FileRecord {
    /// Degraded record for a file that could not be read or stat'ed.
    /// A single bad file never aborts the enclosing scan.
    pub fn zeroed(language: Option<String>) -> Self {
        Self {
            language,
            size_bytes: 0,
            lines: 0,
            last_modified: String::new(),
        }
    }
}

/// Whole-snapshot aggregates, recomputed in full from `files`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub total_files: usize,
    pub total_lines: u64,
    pub total_bytes: u64,
    pub scan_duration_ms: u64,
}

/// Kind of an extracted signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    Function,
    Class,
    Method,
    Arrow,
}

/// Extracted function/class/method signature.
///
/// Ephemeral: computed on demand, never persisted except as transient
/// annotations inside task-context output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub kind: SignatureKind,
    pub params: Vec<String>,
    pub line: usize,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Module-system classification of an export surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    Esm,
    Cjs,
    Mixed,
}

/// A re-export recorded with its source module; `name` is `*` for wildcards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReExport {
    pub name: String,
    pub source: String,
}

/// The set of names a module exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSurface {
    pub named: Vec<String>,
    pub default: Option<String>,
    pub re_exports: Vec<ReExport>,
    pub cjs_exports: Vec<String>,
    pub module_type: ModuleType,
}

impl ExportSurface {
    pub fn empty() -> Self {
        Self {
            named: Vec::new(),
            default: None,
            re_exports: Vec::new(),
            cjs_exports: Vec::new(),
            module_type: ModuleType::Esm,
        }
    }
}

/// Import/require adjacency over snapshot files.
///
/// Edge endpoints are best-effort keys into `Snapshot.files`; dangling edges
/// from renamed or deleted files are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub forward: BTreeMap<String, Vec<String>>,
    pub reverse: BTreeMap<String, Vec<String>>,
    pub stats: GraphStats,
    pub built_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub files_scanned: usize,
    pub files_with_imports: usize,
    pub edge_count: usize,
}

/// A dominant naming pattern with an integer-percentage confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingPattern {
    pub pattern: String,
    pub confidence: u8,
    pub file_count: usize,
    pub examples: Vec<String>,
}

/// Plurality naming pattern within one directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryNaming {
    pub directory: String,
    pub dominant: String,
    pub confidence: u8,
    pub file_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamingConventions {
    pub overall: Vec<NamingPattern>,
    pub by_directory: Vec<DirectoryNaming>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureInfo {
    pub structure_type: String,
    pub max_depth: usize,
    pub avg_depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingInfo {
    pub style: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementInfo {
    pub style: String,
    pub confidence: u8,
    pub file_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOrganization {
    pub structure: StructureInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping: Option<GroupingInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_placement: Option<PlacementInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_placement: Option<PlacementInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barrels: Option<PlacementInfo>,
}

/// One framework idiom with supporting evidence (at most 5 entries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkPattern {
    pub pattern: String,
    pub confidence: u8,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkConvention {
    pub framework: String,
    pub patterns: Vec<FrameworkPattern>,
}

/// Mined conventions, attached to the snapshot when computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConventionSet {
    pub naming: NamingConventions,
    pub file_organization: FileOrganization,
    pub frameworks: Vec<FrameworkConvention>,
    pub extracted_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut snapshot = Snapshot::empty();
        snapshot.generated_at = Some("2026-01-01T00:00:00+00:00".to_string());
        snapshot.files.insert(
            "src/main.rs".to_string(),
            FileRecord {
                language: Some("rust".to_string()),
                size_bytes: 120,
                lines: 10,
                last_modified: "2026-01-01T00:00:00+00:00".to_string(),
            },
        );

        let raw = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn optional_sections_are_omitted_when_absent() {
        let raw = serde_json::to_string(&Snapshot::empty()).unwrap();
        assert!(!raw.contains("dependencies"));
        assert!(!raw.contains("conventions"));
        assert!(!raw.contains("git_commit_hash"));
    }

    #[test]
    fn signature_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SignatureKind::Arrow).unwrap(),
            "\"arrow\""
        );
        assert_eq!(
            serde_json::to_string(&ModuleType::Mixed).unwrap(),
            "\"mixed\""
        );
    }
}
