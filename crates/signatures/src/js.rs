//! JS-family signature extraction: tree-sitter walk with a line-oriented
//! regex scanner as the grammar fallback.

use codeintel_snapshot::{Signature, SignatureKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Parser};

/// Parse with the JavaScript grammar and collect signatures. Returns `None`
/// when the grammar rejects the source (ERROR nodes in the tree), in which
/// case the caller falls back to the regex scanner.
pub fn extract_with_grammar(source: &str) -> Option<Vec<Signature>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut signatures = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        collect_top_level(source, child, &mut signatures);
    }
    Some(signatures)
}

fn collect_top_level(source: &str, node: Node, out: &mut Vec<Signature>) {
    match node.kind() {
        "export_statement" => {
            // `export function f…`, `export default class …`
            if let Some(decl) = node.child_by_field_name("declaration") {
                collect_top_level(source, decl, out);
            } else {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if matches!(
                        child.kind(),
                        "function_declaration"
                            | "generator_function_declaration"
                            | "class_declaration"
                    ) {
                        collect_top_level(source, child, out);
                    }
                }
            }
        }
        "function_declaration" | "generator_function_declaration" => {
            out.push(function_signature(source, node));
        }
        "class_declaration" => collect_class(source, node, out),
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(name) = declarator
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| text(source, n))
                else {
                    continue;
                };
                let Some(value) = declarator.child_by_field_name("value") else {
                    continue;
                };
                if let Some(sig) = value_signature(source, value, &name, node) {
                    out.push(sig);
                }
            }
        }
        "expression_statement" => {
            let Some(expr) = node.named_child(0).filter(|n| n.kind() == "assignment_expression")
            else {
                return;
            };
            let Some(left) = expr.child_by_field_name("left") else {
                return;
            };
            if left.kind() != "member_expression" {
                return;
            }
            let target = text(source, left);
            let is_cjs = target.starts_with("module.exports.") || target.starts_with("exports.");
            if !is_cjs {
                return;
            }
            let Some(name) = target.rsplit('.').next().map(str::to_string) else {
                return;
            };
            if let Some(right) = expr.child_by_field_name("right") {
                if let Some(sig) = value_signature(source, right, &name, node) {
                    out.push(sig);
                }
            }
        }
        _ => {}
    }
}

fn collect_class(source: &str, node: Node, out: &mut Vec<Signature>) {
    let class_name = node
        .child_by_field_name("name")
        .map(|n| text(source, n))
        .unwrap_or_else(|| "anonymous".to_string());

    out.push(Signature {
        name: class_name.clone(),
        kind: SignatureKind::Class,
        params: Vec::new(),
        line: line_of(node),
        is_async: false,
        is_generator: false,
    });

    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        match member.kind() {
            "method_definition" => {
                let Some(name) = member
                    .child_by_field_name("name")
                    .map(|n| text(source, n))
                else {
                    continue;
                };
                out.push(Signature {
                    name: format!("{class_name}.{name}"),
                    kind: SignatureKind::Method,
                    params: params_of(source, member),
                    line: line_of(member),
                    is_async: has_token(member, "async"),
                    is_generator: has_token(member, "*"),
                });
            }
            "field_definition" | "public_field_definition" => {
                let Some(name) = member
                    .child_by_field_name("property")
                    .map(|n| text(source, n))
                else {
                    continue;
                };
                let Some(value) = member.child_by_field_name("value") else {
                    continue;
                };
                let qualified = format!("{class_name}.{name}");
                if let Some(sig) = value_signature(source, value, &qualified, member) {
                    out.push(sig);
                }
            }
            _ => {}
        }
    }
}

/// Signature for a value node when it is a function or arrow expression.
/// `anchor` supplies the reported line (the declaration, not the value).
fn value_signature(source: &str, value: Node, name: &str, anchor: Node) -> Option<Signature> {
    match value.kind() {
        "arrow_function" => Some(Signature {
            name: name.to_string(),
            kind: SignatureKind::Arrow,
            params: params_of(source, value),
            line: line_of(anchor),
            is_async: has_token(value, "async"),
            is_generator: false,
        }),
        "function_expression" | "function" | "generator_function" => Some(Signature {
            name: name.to_string(),
            kind: SignatureKind::Function,
            params: params_of(source, value),
            line: line_of(anchor),
            is_async: has_token(value, "async"),
            is_generator: value.kind() == "generator_function" || has_token(value, "*"),
        }),
        _ => None,
    }
}

fn function_signature(source: &str, node: Node) -> Signature {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(source, n))
        .unwrap_or_else(|| "anonymous".to_string());
    Signature {
        name,
        kind: SignatureKind::Function,
        params: params_of(source, node),
        line: line_of(node),
        is_async: has_token(node, "async"),
        is_generator: node.kind() == "generator_function_declaration" || has_token(node, "*"),
    }
}

/// 1-based source line of a node.
fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn text(source: &str, node: Node) -> String {
    source[node.byte_range()].to_string()
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == token {
            return true;
        }
    }
    false
}

/// Normalized parameter names: plain identifier, the left side of a default,
/// `...rest`, and `{...}` / `[...]` placeholders for destructuring.
fn params_of(source: &str, node: Node) -> Vec<String> {
    let params = node
        .child_by_field_name("parameters")
        .or_else(|| node.child_by_field_name("parameter"));
    let Some(params) = params else {
        return Vec::new();
    };

    if params.kind() == "identifier" {
        // Single-parameter arrow without parens.
        return vec![text(source, params)];
    }

    let mut out = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        out.push(normalize_param(source, child));
    }
    out
}

fn normalize_param(source: &str, node: Node) -> String {
    match node.kind() {
        "identifier" => text(source, node),
        "assignment_pattern" => node
            .child_by_field_name("left")
            .map(|left| normalize_param(source, left))
            .unwrap_or_else(|| text(source, node)),
        "rest_pattern" => {
            let inner = node
                .named_child(0)
                .map(|n| normalize_param(source, n))
                .unwrap_or_default();
            format!("...{inner}")
        }
        "object_pattern" => "{...}".to_string(),
        "array_pattern" => "[...]".to_string(),
        _ => text(source, node),
    }
}

static FALLBACK_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+)?(?:default\s+)?(async\s+)?function\s*(\*)?\s*([A-Za-z_$][\w$]*)\s*\(([^)]*)\)",
    )
    .expect("fallback function regex")
});

static FALLBACK_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?(?:default\s+)?class\s+([A-Za-z_$][\w$]*)")
        .expect("fallback class regex")
});

static FALLBACK_ARROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(async\s+)?(?:\(([^)]*)\)|([A-Za-z_$][\w$]*))\s*=>",
    )
    .expect("fallback arrow regex")
});

/// Line-oriented regex scanner used when both grammar attempts fail.
pub fn fallback_scan(source: &str) -> Vec<Signature> {
    let mut out = Vec::new();

    for caps in FALLBACK_FUNCTION.captures_iter(source) {
        let whole = caps.get(0).unwrap();
        out.push(Signature {
            name: caps[3].to_string(),
            kind: SignatureKind::Function,
            params: split_params(caps.get(4).map_or("", |m| m.as_str())),
            line: line_at(source, whole.start()),
            is_async: caps.get(1).is_some(),
            is_generator: caps.get(2).is_some(),
        });
    }
    for caps in FALLBACK_CLASS.captures_iter(source) {
        let whole = caps.get(0).unwrap();
        out.push(Signature {
            name: caps[1].to_string(),
            kind: SignatureKind::Class,
            params: Vec::new(),
            line: line_at(source, whole.start()),
            is_async: false,
            is_generator: false,
        });
    }
    for caps in FALLBACK_ARROW.captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let params = caps
            .get(3)
            .map(|m| split_params(m.as_str()))
            .or_else(|| caps.get(4).map(|m| vec![m.as_str().to_string()]))
            .unwrap_or_default();
        out.push(Signature {
            name: caps[1].to_string(),
            kind: SignatureKind::Arrow,
            params,
            line: line_at(source, whole.start()),
            is_async: caps.get(2).is_some(),
            is_generator: false,
        });
    }

    out.sort_by_key(|sig| sig.line);
    out
}

/// 1-based line for a byte offset, by counting preceding newlines.
pub fn line_at(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset.min(source.len())]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
        + 1
}

/// Split a raw parameter list the way the grammar-based path normalizes it.
pub fn split_params(raw: &str) -> Vec<String> {
    split_top_level(raw)
        .into_iter()
        .filter_map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            if piece.starts_with('{') {
                return Some("{...}".to_string());
            }
            if piece.starts_with('[') {
                return Some("[...]".to_string());
            }
            let rest = piece.strip_prefix("...");
            let body = rest.unwrap_or(piece);
            let name: String = body
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                .collect();
            if name.is_empty() {
                return None;
            }
            Some(match rest {
                Some(_) => format!("...{name}"),
                None => name,
            })
        })
        .collect()
}

/// Split on commas that sit outside brackets, braces and parens.
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (idx, ch) in raw.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push(&raw[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push(&raw[start..]);
    pieces
}
