//! File-organization mining: tree shape, directory grouping style, test and
//! config placement, barrel-file usage.

use crate::naming::percentage;
use codeintel_snapshot::{
    FileOrganization, GroupingInfo, PlacementInfo, Snapshot, StructureInfo,
};
use std::collections::BTreeSet;

const BY_TYPE_DIRS: &[&str] = &[
    "components", "controllers", "models", "views", "services", "helpers", "utils", "middleware",
    "middlewares", "routes", "handlers", "types", "interfaces", "hooks", "stores", "reducers",
    "actions", "lib", "api",
];

const BY_FEATURE_DIRS: &[&str] = &["features", "modules", "domains", "apps", "packages"];

const TEST_DIR_NAMES: &[&str] = &["test", "tests", "__tests__", "spec", "specs"];

const TEST_SUFFIXES: &[&str] = &[".test.", ".spec.", "_test.", "_spec."];

const CONFIG_BASENAMES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "jsconfig.json",
    "babel.config.js",
    "jest.config.js",
    "vite.config.js",
    "webpack.config.js",
    "rollup.config.js",
    "Cargo.toml",
    "pyproject.toml",
    "setup.cfg",
    "mix.exs",
    "Gemfile",
    "composer.json",
];

const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini"];

fn depth(path: &str) -> usize {
    path.split('/').count()
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Mine tree-shape and placement conventions from the snapshot's file keys.
pub fn mine_organization(snapshot: &Snapshot) -> FileOrganization {
    let paths: Vec<&str> = snapshot.files.keys().map(String::as_str).collect();

    FileOrganization {
        structure: structure_info(&paths),
        grouping: grouping_info(&paths),
        test_placement: test_placement(&paths),
        config_placement: config_placement(&paths),
        barrels: barrel_info(&paths),
    }
}

fn structure_info(paths: &[&str]) -> StructureInfo {
    let depths: Vec<usize> = paths.iter().map(|p| depth(p)).collect();
    let max_depth = depths.iter().copied().max().unwrap_or(0);
    let avg_depth = if depths.is_empty() {
        0.0
    } else {
        depths.iter().sum::<usize>() as f64 / depths.len() as f64
    };
    StructureInfo {
        structure_type: if max_depth <= 2 { "flat" } else { "nested" }.to_string(),
        max_depth,
        avg_depth,
    }
}

fn grouping_info(paths: &[&str]) -> Option<GroupingInfo> {
    let top_dirs: BTreeSet<&str> = paths
        .iter()
        .filter_map(|p| p.split_once('/').map(|(dir, _)| dir))
        .collect();
    if top_dirs.is_empty() {
        return None;
    }

    let count_matches =
        |vocab: &[&str]| top_dirs.iter().filter(|dir| vocab.contains(*dir)).count();
    let by_type = count_matches(BY_TYPE_DIRS);
    let by_feature = count_matches(BY_FEATURE_DIRS);
    if by_type == by_feature {
        return None;
    }

    let (style, matches) = if by_type > by_feature {
        ("by-type", by_type)
    } else {
        ("by-feature", by_feature)
    };
    Some(GroupingInfo {
        style: style.to_string(),
        confidence: percentage(matches, top_dirs.len()),
    })
}

fn test_placement(paths: &[&str]) -> Option<PlacementInfo> {
    let co_located = paths
        .iter()
        .filter(|p| {
            let base = basename(p);
            TEST_SUFFIXES.iter().any(|suffix| base.contains(suffix))
        })
        .count();
    let in_test_dirs = paths
        .iter()
        .filter(|p| p.split('/').any(|segment| TEST_DIR_NAMES.contains(&segment)))
        .count();

    if co_located == 0 && in_test_dirs == 0 {
        return None;
    }
    let total = co_located + in_test_dirs;
    let (style, count) = if co_located >= in_test_dirs {
        ("co-located", co_located)
    } else {
        ("test-directory", in_test_dirs)
    };
    Some(PlacementInfo {
        style: style.to_string(),
        confidence: percentage(count, total),
        file_count: count,
    })
}

fn config_placement(paths: &[&str]) -> Option<PlacementInfo> {
    let candidates: Vec<&str> = paths
        .iter()
        .copied()
        .filter(|p| {
            let base = basename(p);
            let by_name = CONFIG_BASENAMES.contains(&base);
            let dotfile = base.starts_with('.');
            let by_ext = depth(p) <= 2
                && base
                    .rsplit('.')
                    .next()
                    .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext));
            by_name || dotfile || by_ext
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let at_root = candidates.iter().filter(|p| depth(p) == 1).count();
    let (style, count) = if at_root * 2 > candidates.len() {
        ("root", at_root)
    } else {
        ("config-directory", candidates.len() - at_root)
    };
    Some(PlacementInfo {
        style: style.to_string(),
        confidence: percentage(count, candidates.len()),
        file_count: count,
    })
}

fn barrel_info(paths: &[&str]) -> Option<PlacementInfo> {
    let barrels = paths
        .iter()
        .filter(|p| {
            let base = basename(p);
            let stem = base.rsplit_once('.').map_or(base, |(s, _)| s);
            matches!(stem, "index" | "mod" | "__init__")
        })
        .count();
    if barrels == 0 {
        return None;
    }
    let source_dirs: BTreeSet<&str> = paths
        .iter()
        .filter_map(|p| p.rsplit_once('/').map(|(dir, _)| dir))
        .collect();
    Some(PlacementInfo {
        style: "index-files".to_string(),
        confidence: percentage(barrels, source_dirs.len().max(1)),
        file_count: barrels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeintel_snapshot::FileRecord;
    use pretty_assertions::assert_eq;

    fn snapshot_with(paths: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        for path in paths {
            snapshot
                .files
                .insert(path.to_string(), FileRecord::zeroed(None));
        }
        snapshot
    }

    #[test]
    fn shallow_trees_are_flat() {
        let org = mine_organization(&snapshot_with(&["main.js", "src/app.js"]));
        assert_eq!(org.structure.structure_type, "flat");
        assert_eq!(org.structure.max_depth, 2);
    }

    #[test]
    fn deep_trees_are_nested_with_mean_depth() {
        let org = mine_organization(&snapshot_with(&["a.js", "src/deep/nested/mod.js"]));
        assert_eq!(org.structure.structure_type, "nested");
        assert_eq!(org.structure.max_depth, 4);
        assert!((org.structure.avg_depth - 2.5).abs() < 1e-9);
    }

    #[test]
    fn by_type_vocabulary_wins_grouping() {
        let org = mine_organization(&snapshot_with(&[
            "components/Button.jsx",
            "services/api.js",
            "utils/format.js",
            "docs/readme.md",
        ]));
        let grouping = org.grouping.unwrap();
        assert_eq!(grouping.style, "by-type");
        assert_eq!(grouping.confidence, 75);
    }

    #[test]
    fn grouping_counts_only_top_level_directories() {
        let org = mine_organization(&snapshot_with(&[
            "src/components/Button.jsx",
            "src/services/api.js",
        ]));
        assert_eq!(org.grouping, None);
    }

    #[test]
    fn ambiguous_grouping_is_omitted() {
        let org = mine_organization(&snapshot_with(&["src/stuff/a.js", "docs/readme.md"]));
        assert_eq!(org.grouping, None);
    }

    #[test]
    fn test_placement_prefers_the_larger_group() {
        let org = mine_organization(&snapshot_with(&[
            "src/app.js",
            "src/app.test.js",
            "src/util.test.js",
            "tests/integration.js",
        ]));
        let placement = org.test_placement.unwrap();
        assert_eq!(placement.style, "co-located");
        assert_eq!(placement.file_count, 2);
    }

    #[test]
    fn root_heavy_config_labels_root() {
        let org = mine_organization(&snapshot_with(&[
            "package.json",
            "tsconfig.json",
            ".eslintrc",
            "config/extra.yaml",
            "src/main.ts",
        ]));
        let placement = org.config_placement.unwrap();
        assert_eq!(placement.style, "root");
        assert_eq!(placement.confidence, 75);
        assert_eq!(placement.file_count, 3);
    }

    #[test]
    fn barrels_count_against_source_directories() {
        let org = mine_organization(&snapshot_with(&[
            "src/index.js",
            "src/lib/index.js",
            "src/lib/util.js",
        ]));
        let barrels = org.barrels.unwrap();
        assert_eq!(barrels.file_count, 2);
        assert_eq!(barrels.confidence, 100);
    }
}
