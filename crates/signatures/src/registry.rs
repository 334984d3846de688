//! Regex-driven signature detectors for non-JS languages.
//!
//! Each supported language gets a [`Descriptor`] with a function pattern, an
//! optional type/class pattern, and a parameter normalizer. Dispatch is by
//! language name; a language without a descriptor reports `no_detector`.

use crate::js::line_at;
use codeintel_snapshot::{Signature, SignatureKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Per-language extraction rules. Function patterns use named groups:
/// `name` (required), `params` (optional), `async` (optional marker).
pub struct Descriptor {
    function: Regex,
    class: Option<Regex>,
    normalize: fn(&str) -> Vec<String>,
}

static REGISTRY: Lazy<HashMap<&'static str, Descriptor>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(
        "python",
        Descriptor {
            function: re(r"(?m)^\s*(?P<async>async\s+)?def\s+(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)"),
            class: Some(re(r"(?m)^\s*class\s+(?P<name>[A-Za-z_]\w*)")),
            normalize: python_params,
        },
    );
    map.insert(
        "rust",
        Descriptor {
            function: re(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?P<async>async\s+)?fn\s+(?P<name>[A-Za-z_]\w*)(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)"),
            class: Some(re(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?struct\s+(?P<name>[A-Za-z_]\w*)")),
            normalize: rust_params,
        },
    );
    map.insert(
        "go",
        Descriptor {
            function: re(r"(?m)^\s*func\s+(?:\([^)]*\)\s*)?(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)"),
            class: Some(re(r"(?m)^\s*type\s+(?P<name>[A-Za-z_]\w*)\s+struct\b")),
            normalize: go_params,
        },
    );
    map.insert(
        "java",
        Descriptor {
            function: re(r"(?m)^\s*(?:public|protected|private)\s+(?:static\s+)?(?:final\s+)?[\w<>\[\],.?\s]+?\s+(?P<name>[a-z]\w*)\s*\((?P<params>[^)]*)\)\s*[{;]"),
            class: Some(re(r"(?m)^\s*(?:public\s+)?(?:abstract\s+|final\s+)?class\s+(?P<name>[A-Za-z_]\w*)")),
            normalize: last_token_params,
        },
    );
    map.insert(
        "php",
        Descriptor {
            function: re(r"(?m)^\s*(?:(?:public|protected|private|static|abstract|final)\s+)*function\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)"),
            class: Some(re(r"(?m)^\s*(?:abstract\s+|final\s+)?class\s+(?P<name>\w+)")),
            normalize: last_token_params,
        },
    );
    map.insert(
        "ruby",
        Descriptor {
            function: re(r"(?m)^\s*def\s+(?P<name>(?:self\.)?[a-z_]\w*[?!]?)\s*(?:\((?P<params>[^)]*)\))?"),
            class: Some(re(r"(?m)^\s*class\s+(?P<name>[A-Z]\w*)")),
            normalize: simple_params,
        },
    );
    map.insert(
        "elixir",
        Descriptor {
            function: re(r"(?m)^\s*defp?\s+(?P<name>[a-z_]\w*[?!]?)\s*(?:\((?P<params>[^)]*)\))?"),
            class: Some(re(r"(?m)^\s*defmodule\s+(?P<name>[\w.]+)")),
            normalize: simple_params,
        },
    );
    map
});

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("language descriptor regex")
}

/// True when a descriptor exists for the language.
pub fn has_detector(language: &str) -> bool {
    REGISTRY.contains_key(language)
}

/// Apply a language descriptor over raw source. Returns `None` when the
/// language has no descriptor.
pub fn extract_with_descriptor(language: &str, source: &str) -> Option<Vec<Signature>> {
    let descriptor = REGISTRY.get(language)?;
    let mut out = Vec::new();

    for caps in descriptor.function.captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let params = caps
            .name("params")
            .map(|m| (descriptor.normalize)(m.as_str()))
            .unwrap_or_default();
        out.push(Signature {
            name: caps["name"].to_string(),
            kind: SignatureKind::Function,
            params,
            line: line_at(source, whole.start()),
            is_async: caps.name("async").is_some(),
            is_generator: false,
        });
    }
    if let Some(class_re) = &descriptor.class {
        for caps in class_re.captures_iter(source) {
            let whole = caps.get(0).unwrap();
            out.push(Signature {
                name: caps["name"].to_string(),
                kind: SignatureKind::Class,
                params: Vec::new(),
                line: line_at(source, whole.start()),
                is_async: false,
                is_generator: false,
            });
        }
    }

    out.sort_by_key(|sig| sig.line);
    Some(out)
}

/// Python: keep the bare name, dropping `: annotation` and `= default`.
fn python_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|piece| {
            let piece = piece.trim();
            let name = piece
                .split([':', '='])
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

/// Rust: receivers collapse to `self`, everything else drops its `: Type`.
fn rust_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            if piece.ends_with("self") {
                return Some("self".to_string());
            }
            let name = piece.split(':').next().unwrap_or("").trim().to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

/// Go writes `name Type`; the name is the leading token.
fn go_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|piece| {
            let name = piece.trim().split_whitespace().next()?.to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

/// Java and PHP keep the trailing identifier of each `Type name` pair,
/// after dropping any `= default` suffix.
fn last_token_params(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|piece| {
            let piece = piece.split('=').next().unwrap_or("").trim();
            piece.split_whitespace().last().map(str::to_string)
        })
        .collect()
}

/// Ruby and Elixir: literal paren-stripping, then the bare name before any
/// default marker.
fn simple_params(raw: &str) -> Vec<String> {
    raw.trim_matches(['(', ')'])
        .split(',')
        .filter_map(|piece| {
            let piece = piece.trim();
            let name: String = piece
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn python_defs_drop_annotations_and_defaults() {
        let source = "class Job:\n    async def run(self, retries: int = 3):\n        pass\n";
        let sigs = extract_with_descriptor("python", source).unwrap();
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].name, "Job");
        assert_eq!(sigs[0].kind, SignatureKind::Class);
        assert_eq!(sigs[1].name, "run");
        assert_eq!(sigs[1].params, vec!["self", "retries"]);
        assert!(sigs[1].is_async);
        assert_eq!(sigs[1].line, 2);
    }

    #[test]
    fn rust_fns_collapse_receivers() {
        let source = "pub struct Pool;\nimpl Pool {\n    pub async fn acquire(&mut self, timeout: u64) -> Conn {}\n}\n";
        let sigs = extract_with_descriptor("rust", source).unwrap();
        let names: Vec<&str> = sigs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Pool", "acquire"]);
        assert_eq!(sigs[1].params, vec!["self", "timeout"]);
        assert!(sigs[1].is_async);
    }

    #[test]
    fn go_methods_keep_leading_param_token() {
        let source = "func (s *Server) Handle(w http.ResponseWriter, r *http.Request) {}\n";
        let sigs = extract_with_descriptor("go", source).unwrap();
        assert_eq!(sigs[0].name, "Handle");
        assert_eq!(sigs[0].params, vec!["w", "r"]);
    }

    #[test]
    fn java_params_keep_trailing_identifier() {
        let source = "public class Cache {\n    public String get(String key, int maxAge) {\n    }\n}\n";
        let sigs = extract_with_descriptor("java", source).unwrap();
        let get = sigs.iter().find(|s| s.name == "get").unwrap();
        assert_eq!(get.params, vec!["key", "maxAge"]);
        assert!(sigs.iter().any(|s| s.name == "Cache" && s.kind == SignatureKind::Class));
    }

    #[test]
    fn ruby_defs_without_parens_have_no_params() {
        let source = "class Worker\n  def perform!\n  end\n  def self.enqueue(job, at)\n  end\nend\n";
        let sigs = extract_with_descriptor("ruby", source).unwrap();
        let names: Vec<&str> = sigs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Worker", "perform!", "self.enqueue"]);
        assert_eq!(sigs[2].params, vec!["job", "at"]);
    }

    #[test]
    fn elixir_modules_and_private_defs() {
        let source = "defmodule MyApp.Accounts do\n  def get_user(id), do: id\n  defp hash(value \\\\ nil), do: value\nend\n";
        let sigs = extract_with_descriptor("elixir", source).unwrap();
        assert_eq!(sigs[0].name, "MyApp.Accounts");
        assert_eq!(sigs[1].params, vec!["id"]);
        assert_eq!(sigs[2].name, "hash");
        assert_eq!(sigs[2].params, vec!["value"]);
    }

    #[test]
    fn unsupported_language_has_no_descriptor() {
        assert!(extract_with_descriptor("cobol", "x").is_none());
        assert!(!has_detector("cobol"));
        assert!(has_detector("php"));
    }
}
