//! Import paths from `go.mod` module directives.

use std::path::{Path, PathBuf};

use cohesion_core::types::collections::FxHashMap;

/// Module path declared by a `go.mod` file.
pub fn parse_module_directive(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.split("//").next().unwrap_or("").trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '"' || c == '`') {
            continue;
        }
        let path = rest.trim().trim_matches(|c| c == '"' || c == '`');
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

/// Nearest enclosing `go.mod` per directory, memoized.
#[derive(Debug, Default)]
pub struct GoModIndex {
    cache: FxHashMap<PathBuf, Option<(PathBuf, String)>>,
}

impl GoModIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import path of the package in `dir`.
    ///
    /// With a `go.mod` above it the path is the module path joined with the
    /// directory relative to the module root. Without one it falls back to
    /// the directory relative to `root`, or `None` for `root` itself.
    pub fn import_path(&mut self, root: &Path, dir: &Path) -> Option<String> {
        if let Some((module_dir, module_path)) = self.module_for(dir) {
            let rel = relative_slash_path(&module_dir, dir);
            return Some(if rel.is_empty() {
                module_path
            } else {
                format!("{module_path}/{rel}")
            });
        }
        let rel = relative_slash_path(root, dir);
        (!rel.is_empty()).then_some(rel)
    }

    fn module_for(&mut self, dir: &Path) -> Option<(PathBuf, String)> {
        if let Some(cached) = self.cache.get(dir) {
            return cached.clone();
        }
        let found = self.find_uncached(dir);
        self.cache.insert(dir.to_path_buf(), found.clone());
        found
    }

    fn find_uncached(&mut self, dir: &Path) -> Option<(PathBuf, String)> {
        let go_mod = dir.join("go.mod");
        if go_mod.is_file() {
            match std::fs::read_to_string(&go_mod) {
                Ok(content) => {
                    if let Some(module) = parse_module_directive(&content) {
                        return Some((dir.to_path_buf(), module));
                    }
                    tracing::warn!(path = %go_mod.display(), "go.mod without module directive");
                }
                Err(e) => {
                    tracing::warn!(path = %go_mod.display(), error = %e, "unreadable go.mod");
                }
            }
        }
        dir.parent().and_then(|parent| self.module_for(parent))
    }
}

fn relative_slash_path(base: &Path, dir: &Path) -> String {
    dir.strip_prefix(base)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}
