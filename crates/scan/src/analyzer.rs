//! Per-file fact collection: language, size, line count, mtime.

use chrono::{DateTime, SecondsFormat, Utc};
use codeintel_snapshot::{languages, FileRecord};
use std::path::Path;

/// Count lines by scanning raw bytes for 0x0A markers, plus one for trailing
/// content without a final newline. Byte-oriented by design: CRLF and
/// non-UTF-8 content are counted the same way, trading encoding awareness for
/// speed over large trees.
pub fn count_lines(bytes: &[u8]) -> u64 {
    let newlines = bytes.iter().filter(|b| **b == 0x0A).count() as u64;
    match bytes.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}

/// Format a filesystem timestamp as ISO-8601. Millisecond precision so the
/// watermark comparison does not misread sub-second mtime differences.
pub fn iso_timestamp(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as ISO-8601, used as the snapshot watermark.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Collect per-file facts for one path.
///
/// Any read or stat failure degrades the record to zero-valued fields; a
/// single unreadable file never aborts the surrounding scan.
pub fn analyze_file(root: &Path, rel_path: &str) -> FileRecord {
    let path = root.join(rel_path);
    let language = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| languages::language_for_extension(&ext.to_lowercase()))
        .map(str::to_string);

    let meta = match std::fs::metadata(&path) {
        Ok(meta) => meta,
        Err(err) => {
            log::debug!("stat failed for {rel_path}: {err}");
            return FileRecord::zeroed(language);
        }
    };
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::debug!("read failed for {rel_path}: {err}");
            return FileRecord::zeroed(language);
        }
    };

    let last_modified = meta
        .modified()
        .map(iso_timestamp)
        .unwrap_or_default();

    FileRecord {
        language,
        size_bytes: meta.len(),
        lines: count_lines(&bytes),
        last_modified,
    }
}
