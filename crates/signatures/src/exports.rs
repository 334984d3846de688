//! Export-surface extraction for JS-family modules.
//!
//! ESM exports come from a grammar walk over top-level export statements;
//! CommonJS exports come from a regex scan over comment-stripped source. The
//! two mechanisms run independently and together decide the module type.

use codeintel_snapshot::{ExportSurface, ModuleType, ReExport};
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Parser};

/// Walk top-level export statements and collect named exports, the default
/// export and re-exports. Returns `None` when the grammar rejects the source.
pub fn esm_exports(source: &str) -> Option<(Vec<String>, Option<String>, Vec<ReExport>)> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .ok()?;
    let tree = parser.parse(source, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let mut named = Vec::new();
    let mut default = None;
    let mut re_exports = Vec::new();

    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        if node.kind() != "export_statement" {
            continue;
        }
        let from_source = node
            .child_by_field_name("source")
            .map(|n| string_value(source, n));

        if let Some(decl) = node.child_by_field_name("declaration") {
            collect_declaration_names(source, decl, is_default(node), &mut named, &mut default);
            continue;
        }
        if let Some(value) = node.child_by_field_name("value") {
            // `export default <expression>`
            default = Some(match value.kind() {
                "identifier" => text(source, value),
                _ => "anonymous".to_string(),
            });
            continue;
        }

        let mut inner = node.walk();
        for child in node.children(&mut inner) {
            match child.kind() {
                "export_clause" => {
                    collect_specifiers(source, child, from_source.as_deref(), &mut named, &mut re_exports)
                }
                "*" => {
                    if let Some(src) = &from_source {
                        re_exports.push(ReExport {
                            name: "*".to_string(),
                            source: src.clone(),
                        });
                    }
                }
                "namespace_export" => {
                    if let Some(src) = &from_source {
                        re_exports.push(ReExport {
                            name: text(source, child),
                            source: src.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    Some((named, default, re_exports))
}

fn is_default(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == "default");
    found
}

fn collect_declaration_names(
    source: &str,
    decl: Node,
    default_position: bool,
    named: &mut Vec<String>,
    default: &mut Option<String>,
) {
    match decl.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration" => {
            let name = decl
                .child_by_field_name("name")
                .map(|n| text(source, n))
                .unwrap_or_else(|| "anonymous".to_string());
            if default_position {
                *default = Some(name);
            } else {
                named.push(name);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = decl.walk();
            for declarator in decl.children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = declarator
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "identifier")
                {
                    named.push(text(source, name));
                }
            }
        }
        _ => {
            if default_position {
                *default = Some("anonymous".to_string());
            }
        }
    }
}

fn collect_specifiers(
    source: &str,
    clause: Node,
    from_source: Option<&str>,
    named: &mut Vec<String>,
    re_exports: &mut Vec<ReExport>,
) {
    let mut cursor = clause.walk();
    for spec in clause.children(&mut cursor) {
        if spec.kind() != "export_specifier" {
            continue;
        }
        // The exposed name is the alias when renamed, the local name otherwise.
        let exported = spec
            .child_by_field_name("alias")
            .or_else(|| spec.child_by_field_name("name"))
            .map(|n| text(source, n));
        let Some(exported) = exported else { continue };
        match from_source {
            Some(src) => re_exports.push(ReExport {
                name: exported,
                source: src.to_string(),
            }),
            None => named.push(exported),
        }
    }
}

fn text(source: &str, node: Node) -> String {
    source[node.byte_range()].to_string()
}

fn string_value(source: &str, node: Node) -> String {
    text(source, node)
        .trim_matches(['"', '\''])
        .to_string()
}

static CJS_MEMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"module\.exports\.(\w+)\s*=").expect("cjs member regex"));
static CJS_SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*exports\.(\w+)\s*=").expect("cjs shorthand regex"));
static CJS_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"module\.exports\s*=\s*\{([^}]*)\}").expect("cjs object regex"));

/// Drop `//` line comments so commented-out export lines are not counted.
/// String contents are not tracked; a `//` inside a string is a known miss.
pub fn strip_line_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Regex scan for CommonJS export names, de-duplicated first-seen.
pub fn cjs_exports(source: &str) -> Vec<String> {
    let stripped = strip_line_comments(source);
    let mut out: Vec<String> = Vec::new();
    let mut push = |name: String| {
        if !out.contains(&name) {
            out.push(name);
        }
    };

    for caps in CJS_MEMBER.captures_iter(&stripped) {
        push(caps[1].to_string());
    }
    for caps in CJS_SHORTHAND.captures_iter(&stripped) {
        push(caps[1].to_string());
    }
    for caps in CJS_OBJECT.captures_iter(&stripped) {
        for piece in caps[1].split(',') {
            let key: String = piece
                .trim()
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                .collect();
            if !key.is_empty() {
                push(key);
            }
        }
    }
    out
}

/// Combine both mechanisms into one surface with a module-type verdict.
pub fn export_surface(source: &str) -> (ExportSurface, bool) {
    let esm = esm_exports(source);
    let grammar_ok = esm.is_some();
    let (named, default, re_exports) = esm.unwrap_or_default();
    let cjs = cjs_exports(source);

    let has_esm = !named.is_empty() || default.is_some() || !re_exports.is_empty();
    let module_type = match (has_esm, !cjs.is_empty()) {
        (true, true) => ModuleType::Mixed,
        (false, true) => ModuleType::Cjs,
        _ => ModuleType::Esm,
    };

    (
        ExportSurface {
            named,
            default,
            re_exports,
            cjs_exports: cjs,
            module_type,
        },
        grammar_ok,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_declarations_and_specifiers() {
        let source = "export function load() {}\nexport const a = 1, b = 2;\nconst c = 3;\nexport { c, c as alias };\n";
        let (surface, ok) = export_surface(source);
        assert!(ok);
        assert_eq!(surface.named, vec!["load", "a", "b", "c", "alias"]);
        assert_eq!(surface.module_type, ModuleType::Esm);
    }

    #[test]
    fn default_export_forms() {
        let (named_fn, _) = export_surface("export default function main() {}");
        assert_eq!(named_fn.default.as_deref(), Some("main"));

        let (ident, _) = export_surface("const app = 1;\nexport default app;\n");
        assert_eq!(ident.default.as_deref(), Some("app"));

        let (anon, _) = export_surface("export default () => {};");
        assert_eq!(anon.default.as_deref(), Some("anonymous"));
    }

    #[test]
    fn re_exports_record_their_source() {
        let source = "export { parse, tokenize as lex } from './lexer';\nexport * from './ast';\n";
        let (surface, _) = export_surface(source);
        assert!(surface.named.is_empty());
        assert_eq!(surface.re_exports.len(), 3);
        assert_eq!(surface.re_exports[0].name, "parse");
        assert_eq!(surface.re_exports[0].source, "./lexer");
        assert_eq!(surface.re_exports[1].name, "lex");
        assert_eq!(surface.re_exports[2].name, "*");
        assert_eq!(surface.re_exports[2].source, "./ast");
    }

    #[test]
    fn cjs_patterns_deduplicate_first_seen() {
        let source = "module.exports.run = run;\nexports.stop = stop;\nmodule.exports.run = other;\n// exports.ghost = 1;\nmodule.exports = { run, extra: helper };\n";
        let exports = cjs_exports(source);
        assert_eq!(exports, vec!["run", "stop", "extra"]);
    }

    #[test]
    fn module_type_classification() {
        let (esm, _) = export_surface("export const x = 1;");
        assert_eq!(esm.module_type, ModuleType::Esm);

        let (cjs, _) = export_surface("module.exports.x = 1;");
        assert_eq!(cjs.module_type, ModuleType::Cjs);

        let (mixed, _) = export_surface("export const a = 1;\nmodule.exports.b = 2;\n");
        assert_eq!(mixed.module_type, ModuleType::Mixed);
    }
}
