//! Source-directory discovery and file enumeration.

use crate::git;
use codeintel_snapshot::languages;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Vendor, build and cache directories the walker never enters.
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "third_party",
    "third-party",
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    "tmp",
    "logs",
    "__pycache__",
    "venv",
    "deps",
    "_build",
];

/// Conventional source-directory vocabulary used during discovery.
const SOURCE_DIR_NAMES: &[&str] = &[
    "src", "lib", "app", "apps", "cmd", "pkg", "internal", "server", "client", "api", "core",
    "test", "tests", "spec", "bin", "scripts", "tools", "packages", "modules", "services",
    "components",
];

fn is_ignored_dir_name(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    let lowered = name.to_lowercase();
    IGNORED_DIRS.iter().any(|ignored| *ignored == lowered)
}

fn has_source_file_children(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && languages::language_for_path(&path).is_some() {
            return true;
        }
    }
    false
}

/// Discover the source directories of a project.
///
/// Scans top-level entries, skipping the fixed ignore-set, dotdirs and
/// anything git reports as ignored. A directory qualifies by name (known
/// source vocabulary) or by containing at least one file in a known language.
/// Loose source files at the root add `"."`; an empty result falls back to
/// scanning the whole tree from `"."` — the set is never empty.
pub fn discover_source_dirs(root: &Path) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut root_has_loose_sources = false;

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("Failed to read project root {}: {err}", root.display());
            return vec![".".to_string()];
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };

        if path.is_file() {
            if languages::language_for_path(&path).is_some() && !git::is_ignored(root, &name) {
                root_has_loose_sources = true;
            }
            continue;
        }
        if !path.is_dir() {
            continue;
        }
        if is_ignored_dir_name(&name) {
            continue;
        }
        if git::is_ignored(root, &name) {
            log::debug!("Skipping git-ignored top-level entry {name}");
            continue;
        }

        let lowered = name.to_lowercase();
        if SOURCE_DIR_NAMES.iter().any(|known| *known == lowered)
            || has_source_file_children(&path)
        {
            dirs.push(name);
        }
    }

    dirs.sort();
    if root_has_loose_sources {
        dirs.push(".".to_string());
    }
    if dirs.is_empty() {
        dirs.push(".".to_string());
    }
    dirs
}

/// Depth-first recursive walker guarded by a visited-path set so symlink
/// cycles cannot recurse forever.
pub struct SourceWalker {
    visited: HashSet<PathBuf>,
}

impl SourceWalker {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
        }
    }

    /// Enumerate candidate source files under `dir`, appending to `files`.
    pub fn walk(&mut self, dir: &Path, files: &mut Vec<PathBuf>) {
        let canonical = match dir.canonicalize() {
            Ok(path) => path,
            Err(err) => {
                log::debug!("Skipping unreadable directory {}: {err}", dir.display());
                return;
            }
        };
        if !self.visited.insert(canonical) {
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("Failed to read directory {}: {err}", dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if path.is_dir() {
                if is_ignored_dir_name(name) {
                    continue;
                }
                self.walk(&path, files);
            } else if path.is_file() {
                if languages::is_binary_path(&path) {
                    continue;
                }
                files.push(path);
            }
        }
    }
}

impl Default for SourceWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Enumerate all candidate files across a project's source directories,
/// returned as paths relative to the root.
///
/// A lone `"."` is the whole-tree fallback and is walked recursively. When
/// `"."` appears alongside named directories it stands for the loose files
/// sitting directly at the root; walking it there would re-enter every
/// listed directory.
pub fn collect_source_files(root: &Path, source_dirs: &[String]) -> Vec<String> {
    let mut walker = SourceWalker::new();
    let mut absolute = Vec::new();
    let whole_tree = source_dirs.len() == 1 && source_dirs[0] == ".";

    for dir in source_dirs {
        if dir == "." {
            if whole_tree {
                walker.walk(root, &mut absolute);
            } else if let Ok(entries) = std::fs::read_dir(root) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_file() && !languages::is_binary_path(&path) {
                        absolute.push(path);
                    }
                }
            }
            continue;
        }
        walker.walk(&root.join(dir), &mut absolute);
    }

    let mut files: Vec<String> = absolute
        .into_iter()
        .filter_map(|path| {
            path.strip_prefix(root)
                .ok()
                .map(|rel| rel.to_string_lossy().into_owned())
        })
        .collect();
    files.sort();
    files.dedup();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovers_known_and_source_bearing_directories() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::create_dir_all(temp.path().join("engine")).unwrap();
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        fs::create_dir_all(temp.path().join("node_modules/pkg")).unwrap();
        fs::write(temp.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(temp.path().join("engine/core.py"), "x = 1").unwrap();
        fs::write(temp.path().join("docs/readme.txt"), "hello").unwrap();

        let dirs = discover_source_dirs(temp.path());
        assert_eq!(dirs, vec!["engine".to_string(), "src".to_string()]);
    }

    #[test]
    fn loose_root_sources_add_dot() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/a.js"), "").unwrap();
        fs::write(temp.path().join("index.js"), "module.exports = {};").unwrap();

        let dirs = discover_source_dirs(temp.path());
        assert_eq!(dirs, vec!["src".to_string(), ".".to_string()]);
    }

    #[test]
    fn never_returns_empty_set() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("misc")).unwrap();
        fs::write(temp.path().join("misc/notes.txt"), "no code here").unwrap();

        let dirs = discover_source_dirs(temp.path());
        assert_eq!(dirs, vec![".".to_string()]);
    }

    #[test]
    fn whole_tree_fallback_scans_nested_sources() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("misc/nested")).unwrap();
        fs::write(temp.path().join("misc/nested/deep.js"), "x").unwrap();

        // "misc" is neither vocabulary nor source-bearing at the top level,
        // so discovery falls back to the whole tree.
        let dirs = discover_source_dirs(temp.path());
        assert_eq!(dirs, vec![".".to_string()]);

        let files = collect_source_files(temp.path(), &dirs);
        assert_eq!(files, vec!["misc/nested/deep.js".to_string()]);
    }

    #[test]
    fn loose_dot_alongside_dirs_stays_shallow() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::create_dir_all(temp.path().join("misc")).unwrap();
        fs::write(temp.path().join("src/app.js"), "x").unwrap();
        fs::write(temp.path().join("index.js"), "x").unwrap();
        fs::write(temp.path().join("misc/skipped.txt"), "not a source dir").unwrap();

        let files = collect_source_files(
            temp.path(),
            &["src".to_string(), ".".to_string()],
        );
        assert_eq!(
            files,
            vec!["index.js".to_string(), "src/app.js".to_string()]
        );
    }

    #[test]
    fn git_ignored_loose_root_files_do_not_add_dot() {
        let temp = tempdir().unwrap();
        crate::git::test_support::init_repo(temp.path());
        fs::write(temp.path().join(".gitignore"), "generated.js\n").unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/app.js"), "x").unwrap();
        fs::write(temp.path().join("generated.js"), "x").unwrap();

        let dirs = discover_source_dirs(temp.path());
        assert_eq!(dirs, vec!["src".to_string()]);
    }

    #[test]
    fn walk_skips_vendor_dirs_and_binary_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/node_modules/dep")).unwrap();
        fs::write(temp.path().join("src/app.js"), "x").unwrap();
        fs::write(temp.path().join("src/logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(temp.path().join("src/node_modules/dep/index.js"), "x").unwrap();

        let files = collect_source_files(temp.path(), &["src".to_string()]);
        assert_eq!(files, vec!["src/app.js".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn walk_survives_symlink_cycles() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/sub")).unwrap();
        fs::write(temp.path().join("src/sub/a.js"), "x").unwrap();
        std::os::unix::fs::symlink(temp.path().join("src"), temp.path().join("src/sub/loop"))
            .unwrap();

        let files = collect_source_files(temp.path(), &["src".to_string()]);
        assert!(files.contains(&"src/sub/a.js".to_string()));
    }
}
