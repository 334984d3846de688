//! Per-file signature and export-surface extraction.
//!
//! JS-family files go through an AST walk (after a type-stripping pass for
//! typed supersets) with a regex scanner as fallback; other languages go
//! through per-language regex descriptors. Extraction never fails hard: every
//! result carries what could be collected plus an optional error code.

pub mod exports;
pub mod imports;
pub mod js;
pub mod registry;
pub mod strip;

use codeintel_snapshot::{languages, ExportSurface, ExtractErrorCode, Signature};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Signatures extracted from one file, tagged with an error code when the
/// result is partial or empty for a known reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureResult {
    pub signatures: Vec<Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExtractErrorCode>,
}

impl SignatureResult {
    fn failed(language: Option<String>, error: ExtractErrorCode) -> Self {
        Self {
            signatures: Vec::new(),
            language,
            error: Some(error),
        }
    }
}

/// Export surface of one file, with the same partial-result policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    #[serde(flatten)]
    pub surface: ExportSurface,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExtractErrorCode>,
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

fn read_source(path: &Path, code: Option<&str>) -> Option<String> {
    match code {
        Some(code) => Some(code.to_string()),
        None => std::fs::read_to_string(path).ok(),
    }
}

/// Extract signatures from `path`, or from `code` when supplied (the file
/// then only provides the extension).
pub fn extract_signatures(path: &Path, code: Option<&str>) -> SignatureResult {
    let Some(ext) = extension_of(path) else {
        return SignatureResult::failed(None, ExtractErrorCode::UnknownLanguage);
    };
    let Some(language) = languages::language_for_extension(&ext).map(str::to_string) else {
        return SignatureResult::failed(None, ExtractErrorCode::UnknownLanguage);
    };
    let Some(source) = read_source(path, code) else {
        return SignatureResult::failed(Some(language), ExtractErrorCode::FileNotFound);
    };

    if languages::is_js_family(&language) {
        let jsx = ext.ends_with('x');
        let prepared = if languages::needs_type_stripping(&ext) {
            strip::preprocess_typescript(&source, jsx)
        } else {
            source
        };

        if let Some(signatures) = js::extract_with_grammar(&prepared) {
            return SignatureResult {
                signatures,
                language: Some(language),
                error: None,
            };
        }
        log::debug!("grammar rejected {}, using fallback scan", path.display());
        let signatures = js::fallback_scan(&prepared);
        if signatures.is_empty() {
            return SignatureResult::failed(Some(language), ExtractErrorCode::ParseFailed);
        }
        return SignatureResult {
            signatures,
            language: Some(language),
            error: None,
        };
    }

    match registry::extract_with_descriptor(&language, &source) {
        Some(signatures) => SignatureResult {
            signatures,
            language: Some(language),
            error: None,
        },
        None => SignatureResult::failed(Some(language), ExtractErrorCode::NoDetector),
    }
}

/// Extract the export surface of `path`. Only JS-family files have one;
/// other languages report `unsupported_language`.
pub fn extract_exports(path: &Path) -> ExportResult {
    let empty = |language: Option<String>, error: ExtractErrorCode| ExportResult {
        surface: ExportSurface::empty(),
        language,
        error: Some(error),
    };

    let Some(ext) = extension_of(path) else {
        return empty(None, ExtractErrorCode::UnknownLanguage);
    };
    let Some(language) = languages::language_for_extension(&ext).map(str::to_string) else {
        return empty(None, ExtractErrorCode::UnknownLanguage);
    };
    if !languages::is_js_family(&language) {
        return empty(Some(language), ExtractErrorCode::UnsupportedLanguage);
    }
    let Some(source) = read_source(path, None) else {
        return empty(Some(language), ExtractErrorCode::FileNotFound);
    };

    let prepared = if languages::needs_type_stripping(&ext) {
        strip::preprocess_typescript(&source, ext.ends_with('x'))
    } else {
        source
    };
    let (surface, grammar_ok) = exports::export_surface(&prepared);

    let empty_surface = surface.named.is_empty()
        && surface.default.is_none()
        && surface.re_exports.is_empty()
        && surface.cjs_exports.is_empty();
    let error = if !grammar_ok && empty_surface {
        Some(ExtractErrorCode::ParseFailed)
    } else {
        None
    };
    ExportResult {
        surface,
        language: Some(language),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_snapshot::{ModuleType, SignatureKind};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn typescript_annotations_do_not_leak_into_signatures() {
        let code = "export function format(value: number, width?: number): string {\n  return String(value);\n}\n";
        let result = extract_signatures(Path::new("fmt.ts"), Some(code));
        assert_eq!(result.error, None);
        assert_eq!(result.language.as_deref(), Some("typescript"));
        assert_eq!(result.signatures.len(), 1);
        assert_eq!(result.signatures[0].name, "format");
        assert_eq!(result.signatures[0].params, vec!["value", "width"]);
        assert_eq!(result.signatures[0].line, 1);
    }

    #[test]
    fn missing_file_reports_file_not_found() {
        let temp = tempdir().unwrap();
        let result = extract_signatures(&temp.path().join("gone.js"), None);
        assert_eq!(result.error, Some(ExtractErrorCode::FileNotFound));
        assert_eq!(result.language.as_deref(), Some("javascript"));
        assert!(result.signatures.is_empty());
    }

    #[test]
    fn unknown_extension_reports_unknown_language() {
        let result = extract_signatures(Path::new("notes.txt"), Some("hello"));
        assert_eq!(result.error, Some(ExtractErrorCode::UnknownLanguage));
        assert_eq!(result.language, None);
    }

    #[test]
    fn language_without_descriptor_reports_no_detector() {
        let result = extract_signatures(Path::new("query.sql"), Some("select 1;"));
        assert_eq!(result.error, Some(ExtractErrorCode::NoDetector));
        assert_eq!(result.language.as_deref(), Some("sql"));
    }

    #[test]
    fn broken_js_falls_back_to_regex_scan() {
        let code = "function partial(a, b) {\n  if (\n";
        let result = extract_signatures(Path::new("broken.js"), Some(code));
        assert_eq!(result.error, None);
        assert_eq!(result.signatures.len(), 1);
        assert_eq!(result.signatures[0].name, "partial");
    }

    #[test]
    fn unparseable_js_reports_parse_failed() {
        let result = extract_signatures(Path::new("junk.js"), Some(")))) ===> {{{{"));
        assert_eq!(result.error, Some(ExtractErrorCode::ParseFailed));
        assert!(result.signatures.is_empty());
    }

    #[test]
    fn python_goes_through_the_descriptor_registry() {
        let result = extract_signatures(Path::new("job.py"), Some("def run(x: int = 1):\n    pass\n"));
        assert_eq!(result.error, None);
        assert_eq!(result.signatures[0].name, "run");
        assert_eq!(result.signatures[0].kind, SignatureKind::Function);
        assert_eq!(result.signatures[0].params, vec!["x"]);
    }

    #[test]
    fn exports_from_a_real_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mod.js");
        std::fs::write(&path, "export const a = 1;\nmodule.exports.b = 2;\n").unwrap();

        let result = extract_exports(&path);
        assert_eq!(result.error, None);
        assert_eq!(result.surface.named, vec!["a"]);
        assert_eq!(result.surface.cjs_exports, vec!["b"]);
        assert_eq!(result.surface.module_type, ModuleType::Mixed);
    }

    #[test]
    fn exports_for_non_js_language_are_unsupported() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("main.rs");
        std::fs::write(&path, "pub fn a() {}\n").unwrap();

        let result = extract_exports(&path);
        assert_eq!(result.error, Some(ExtractErrorCode::UnsupportedLanguage));
        assert_eq!(result.surface.module_type, ModuleType::Esm);
    }
}
