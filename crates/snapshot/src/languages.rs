//! Extension-based language lookup shared by the walker, the analyzer and the
//! signature extractors.

/// Map a file extension (lowercase, no dot) to a language name.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let lang = match ext {
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" | "mts" | "cts" => "typescript",
        "py" | "pyw" => "python",
        "rs" => "rust",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "rb" => "ruby",
        "php" => "php",
        "ex" | "exs" => "elixir",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "cs" => "csharp",
        "swift" => "swift",
        "scala" => "scala",
        "dart" => "dart",
        "lua" => "lua",
        "sh" | "bash" | "zsh" => "shell",
        "sql" => "sql",
        _ => return None,
    };
    Some(lang)
}

/// Map a path to a language name via its extension.
pub fn language_for_path(path: &std::path::Path) -> Option<&'static str> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| language_for_extension(&ext.to_lowercase()))
}

/// Extensions the walker refuses to descend into byte-by-byte.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svgz", "woff", "woff2", "ttf", "otf",
    "eot", "zip", "gz", "tar", "bz2", "xz", "7z", "rar", "pdf", "exe", "dll", "so", "dylib", "a",
    "o", "class", "pyc", "pyo", "wasm", "jar", "war", "sqlite", "db", "bin", "dat", "mp3", "mp4",
    "avi", "mov", "wav", "ogg", "flac", "lock",
];

/// True when the extension marks a file the engine should never read as source.
pub fn is_binary_extension(ext: &str) -> bool {
    BINARY_EXTENSIONS.iter().any(|candidate| *candidate == ext)
}

/// True when the path carries a binary extension (suffix match).
pub fn is_binary_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| is_binary_extension(&ext.to_lowercase()))
        .unwrap_or(false)
}

/// True for the JS family handled by the tree-sitter grammar.
pub fn is_js_family(language: &str) -> bool {
    matches!(language, "javascript" | "typescript")
}

/// True for extensions that carry typed/JSX superset syntax and need the
/// stripping preprocessor before parsing.
pub fn needs_type_stripping(ext: &str) -> bool {
    matches!(ext, "ts" | "tsx" | "mts" | "cts")
}
