//! Module loader: finds Go packages under a root, parses their files and
//! resolves each package up front.

pub mod go_mod;
pub mod walker;

use std::path::{Path, PathBuf};
use std::time::Instant;

use cohesion_core::config::ScanConfig;
use cohesion_core::errors::{LoadError, PipelineResult};
use cohesion_core::tracing::metrics;
use tracing::field::Empty;
use tree_sitter::{Node, Tree};

use crate::cohesion::{build_graph, DependencyGraph};
use crate::parsers::go::{package_name, parse_go};
use crate::semantics::{ModuleSemantics, SourceUnit};

pub use go_mod::GoModIndex;
pub use walker::{discover, ModuleCandidate};

/// One parsed Go file.
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    pub tree: Tree,
    /// Module-global offset of the first byte.
    pub base_offset: u64,
    pub error_count: u32,
}

impl SourceFile {
    fn unit(&self) -> SourceUnit<'_> {
        SourceUnit {
            display_path: self.display_path(),
            source: &self.source,
            tree: &self.tree,
            base_offset: self.base_offset,
        }
    }

    pub fn display_path(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// A loaded, resolved Go package.
pub struct LoadedModule {
    /// Name from the `package` clause.
    pub name: String,
    /// Import path.
    pub path: String,
    pub dir: PathBuf,
    pub files: Vec<SourceFile>,
    pub semantics: ModuleSemantics,
}

impl LoadedModule {
    pub fn syntax_errors(&self) -> u32 {
        self.files.iter().map(|f| f.error_count).sum()
    }

    pub fn roots(&self) -> Vec<Node<'_>> {
        self.files.iter().map(SourceFile::root).collect()
    }

    /// Build this module's dependency graph.
    pub fn dependency_graph(&self) -> DependencyGraph {
        let span = tracing::info_span!(
            "dependency_graph",
            module = %self.path,
            graph_nodes = Empty,
            graph_edges = Empty,
            resolution_failures = Empty,
        );
        let _entered = span.enter();
        let (graph, failures) = build_graph(&self.semantics, &self.roots());
        span.record(metrics::GRAPH_NODES, graph.node_count());
        span.record(metrics::GRAPH_EDGES, graph.edge_count());
        span.record(metrics::RESOLUTION_FAILURES, failures);
        tracing::info!("dependency graph built");
        graph
    }
}

/// Loads Go packages below a root directory.
pub struct ModuleLoader {
    root: PathBuf,
    scan: ScanConfig,
}

impl ModuleLoader {
    /// Fails with `RootNotFound` when `root` is not a readable directory.
    pub fn new(root: impl AsRef<Path>, scan: ScanConfig) -> Result<Self, LoadError> {
        let given = root.as_ref();
        let root = std::fs::canonicalize(given).map_err(|_| LoadError::RootNotFound {
            path: given.to_path_buf(),
        })?;
        if !root.is_dir() {
            return Err(LoadError::RootNotFound {
                path: given.to_path_buf(),
            });
        }
        Ok(Self { root, scan })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate directories in path order.
    pub fn discover(&self) -> Result<Vec<ModuleCandidate>, LoadError> {
        let candidates = discover(&self.root, &self.scan)?;
        tracing::info!(
            root = %self.root.display(),
            count = candidates.len(),
            "discovered Go packages"
        );
        Ok(candidates)
    }

    /// Load every candidate in order, collecting per-module failures.
    pub fn load_all(&self) -> Result<PipelineResult<Vec<LoadedModule>>, LoadError> {
        let mut index = GoModIndex::new();
        let mut result = PipelineResult::<Vec<LoadedModule>>::default();
        for candidate in self.discover()? {
            let import_path = index.import_path(&self.root, &candidate.dir);
            match self.load(&candidate, import_path.as_deref()) {
                Ok(modules) => result.data.extend(modules),
                Err(e) => {
                    tracing::warn!(dir = %candidate.dir.display(), error = %e, "module failed to load");
                    result.add_error(e.into());
                }
            }
        }
        Ok(result)
    }

    /// Parse and resolve the package(s) in one directory.
    ///
    /// Yields the package itself and, with tests enabled, its external
    /// `_test` package when the directory has one. `import_path` is `None`
    /// for a root without `go.mod`, in which case the package name is used.
    pub fn load(
        &self,
        candidate: &ModuleCandidate,
        import_path: Option<&str>,
    ) -> Result<Vec<LoadedModule>, LoadError> {
        let span = tracing::debug_span!(
            "load_module",
            dir = %candidate.dir.display(),
            parse_time_us = Empty,
        );
        let _entered = span.enter();
        let started = Instant::now();
        let max_size = self.scan.effective_max_file_size();

        let mut parsed = Vec::with_capacity(candidate.files.len());
        for path in &candidate.files {
            let size = std::fs::metadata(path)
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
                .len();
            if size > max_size {
                return Err(LoadError::FileTooLarge {
                    path: path.clone(),
                    size,
                    max: max_size,
                });
            }
            let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let file = parse_go(&source, path)?;
            if file.error_count > 0 {
                tracing::warn!(
                    path = %path.display(),
                    errors = file.error_count,
                    "syntax errors, analysis of this file will be partial"
                );
            }
            let name = package_name(&file.tree, &source)
                .map(str::to_string)
                .ok_or_else(|| LoadError::Parse {
                    path: path.clone(),
                    message: "missing package clause".to_string(),
                })?;
            parsed.push((name, path.clone(), source, file));
        }

        let groups = group_by_package(&candidate.dir, parsed)?;
        let base_path = import_path.map(str::to_string);
        let modules = groups
            .into_iter()
            .map(|group| {
                let path = match (&base_path, group.external_test) {
                    (Some(base), false) => base.clone(),
                    (Some(base), true) => format!("{base}_test"),
                    (None, _) => group.name.clone(),
                };
                assemble(group.name, path, candidate.dir.clone(), group.files)
            })
            .collect();

        span.record(metrics::PARSE_TIME_US, started.elapsed().as_micros() as u64);
        tracing::debug!("parsed and resolved");
        Ok(modules)
    }
}

type ParsedEntry = (String, PathBuf, String, crate::parsers::ParsedFile);

struct PackageGroup {
    name: String,
    /// Black-box test package `<name>_test` living next to the package.
    external_test: bool,
    files: Vec<ParsedEntry>,
}

/// Split a directory's files into its package and, if present, the
/// external test package. Any other package name is a conflict.
fn group_by_package(dir: &Path, parsed: Vec<ParsedEntry>) -> Result<Vec<PackageGroup>, LoadError> {
    // Non-test files decide the package name.
    let anchor = parsed
        .iter()
        .find(|(_, path, _, _)| !is_test_file(path))
        .or_else(|| parsed.first())
        .map(|(name, _, _, _)| name.clone());

    let mut primary: Option<PackageGroup> = None;
    let mut external: Option<PackageGroup> = None;
    for entry in parsed {
        let name = entry.0.clone();
        let external_test = is_test_file(&entry.1)
            && anchor.as_deref().is_some_and(|a| name == format!("{a}_test"));
        let slot = if external_test {
            &mut external
        } else {
            &mut primary
        };
        match slot {
            Some(group) if group.name == name => group.files.push(entry),
            Some(group) => {
                return Err(LoadError::ConflictingPackages {
                    dir: dir.to_path_buf(),
                    first: group.name.clone(),
                    second: name,
                })
            }
            None => {
                *slot = Some(PackageGroup {
                    name,
                    external_test,
                    files: vec![entry],
                })
            }
        }
    }

    Ok(primary.into_iter().chain(external).collect())
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

/// Lay files out back to back and resolve them as one module.
fn assemble(name: String, path: String, dir: PathBuf, entries: Vec<ParsedEntry>) -> LoadedModule {
    let mut base = 0u64;
    let files: Vec<SourceFile> = entries
        .into_iter()
        .map(|(_, file_path, source, parsed)| {
            let base_offset = base;
            base += source.len() as u64 + 1;
            SourceFile {
                path: file_path,
                source,
                tree: parsed.tree,
                base_offset,
                error_count: parsed.error_count,
            }
        })
        .collect();

    let units: Vec<SourceUnit<'_>> = files.iter().map(SourceFile::unit).collect();
    let semantics = ModuleSemantics::resolve(&path, &units);
    drop(units);

    LoadedModule {
        name,
        path,
        dir,
        files,
        semantics,
    }
}
