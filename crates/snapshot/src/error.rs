use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for snapshot storage operations
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Errors that can occur while reading or writing the persisted snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot document could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid path supplied by the caller
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Error codes attached to partial extraction results.
///
/// Extraction functions never fail hard; they return what they could collect
/// together with one of these tags so callers can proceed with degraded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractErrorCode {
    FileNotFound,
    UnknownLanguage,
    NoDetector,
    ParseFailed,
    UnsupportedLanguage,
}

/// Why a persisted snapshot no longer reflects the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// No snapshot has ever been persisted
    NoIntel,
    /// Snapshot records a commit that can no longer be diffed against HEAD;
    /// a full rescan is required
    CommitMissing,
    /// Git reported concrete changed paths between the recorded commit and HEAD
    FilesChanged,
    /// No git hash recorded and at least one source file is newer than the
    /// snapshot watermark
    MtimeNewer,
    /// Snapshot carries neither a git hash nor a generated-at watermark
    NoWatermark,
}

/// Outcome of a staleness check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StalenessReport {
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StaleReason>,
    #[serde(default)]
    pub changed_files: Vec<String>,
}

impl StalenessReport {
    pub fn fresh() -> Self {
        Self {
            stale: false,
            reason: None,
            changed_files: Vec::new(),
        }
    }

    pub fn stale(reason: StaleReason, changed_files: Vec<String>) -> Self {
        Self {
            stale: true,
            reason: Some(reason),
            changed_files,
        }
    }
}
