//! Directory discovery: every directory holding Go files is a candidate
//! module.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cohesion_core::config::ScanConfig;
use cohesion_core::errors::LoadError;
use ignore::overrides::OverrideBuilder;
use ignore::{DirEntry, WalkBuilder};

/// A directory with at least one Go file to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCandidate {
    pub dir: PathBuf,
    /// Go files in name order, `_test.go` files included only when enabled.
    pub files: Vec<PathBuf>,
}

/// Walk `root` and group Go files by directory, in path order.
///
/// Like the `./...` pattern of the go tool, `testdata` and `vendor`
/// directories and directories starting with `_` or `.` are skipped.
/// `.gitignore` rules and `extra_ignore` patterns are honored.
pub fn discover(root: &Path, scan: &ScanConfig) -> Result<Vec<ModuleCandidate>, LoadError> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .parents(false)
        .follow_links(scan.effective_follow_symlinks())
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    if !scan.extra_ignore.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in &scan.extra_ignore {
            overrides
                .add(&format!("!{pattern}"))
                .map_err(|e| LoadError::Walk {
                    path: root.to_path_buf(),
                    message: format!("invalid ignore pattern {pattern:?}: {e}"),
                })?;
        }
        let overrides = overrides.build().map_err(|e| LoadError::Walk {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        builder.overrides(overrides);
    }

    let include_tests = scan.effective_include_tests();
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if !is_go_source(path, include_tests) {
            continue;
        }
        if let Some(dir) = path.parent() {
            by_dir
                .entry(dir.to_path_buf())
                .or_default()
                .push(path.to_path_buf());
        }
    }

    Ok(by_dir
        .into_iter()
        .map(|(dir, mut files)| {
            files.sort();
            ModuleCandidate { dir, files }
        })
        .collect())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_some_and(|t| t.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "testdata" || name == "vendor" || name.starts_with('_') || name.starts_with('.')
}

/// `.go` files, minus `_test.go` files unless tests are included.
pub fn is_go_source(path: &Path, include_tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if !name.ends_with(".go") || name.starts_with('.') || name.starts_with('_') {
        return false;
    }
    include_tests || !name.ends_with("_test.go")
}
