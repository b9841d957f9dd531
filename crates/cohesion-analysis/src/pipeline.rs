//! Run an analysis over every Go package below a root.
//!
//! Discovery and import-path derivation are sequential; each package is
//! then loaded, resolved and analyzed on the rayon pool. Reports come back
//! in discovery order.

use std::fmt;
use std::path::{Path, PathBuf};

use cohesion_core::config::CohesionConfig;
use cohesion_core::errors::{LoadError, PipelineError, PipelineResult};
use cohesion_core::tracing::metrics;
use cohesion_core::traits::{Cancellable, CancellationToken};
use rayon::prelude::*;
use serde::Serialize;
use tracing::field::Empty;

use crate::cohesion::CohesionSummary;
use crate::loader::{GoModIndex, LoadedModule, ModuleCandidate, ModuleLoader};
use crate::reports::{render_graph, DependencyListing, SummaryText};
use crate::tools::{dump_tree, DeclarationStats};

/// What to compute for each module.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Connected components, average degree and density.
    Metrics,
    /// Nodes and their outgoing references.
    Dependencies,
    /// One SVG per module written into `out_dir`.
    Graph { out_dir: PathBuf },
    /// Declaration counts.
    Stats,
    /// Indented syntax tree listing.
    Format,
}

impl Analysis {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Metrics => "metrics",
            Self::Dependencies => "dependencies",
            Self::Graph { .. } => "graph",
            Self::Stats => "stats",
            Self::Format => "format",
        }
    }
}

/// Result of one analysis on one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleOutput {
    Metrics(CohesionSummary),
    Dependencies(DependencyListing),
    Graph { path: PathBuf },
    Stats(DeclarationStats),
    Format { listing: String },
}

impl fmt::Display for ModuleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics(summary) => write!(f, "{}", SummaryText(summary)),
            Self::Dependencies(listing) => write!(f, "{listing}"),
            Self::Graph { path } => writeln!(f, "{}", path.display()),
            Self::Stats(stats) => write!(f, "{stats}"),
            Self::Format { listing } => f.write_str(listing),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReport {
    /// Import path.
    pub path: String,
    /// Package name.
    pub name: String,
    pub syntax_errors: u32,
    pub output: ModuleOutput,
}

/// Analyze one loaded module.
pub fn analyze_module(
    module: &LoadedModule,
    config: &CohesionConfig,
    analysis: &Analysis,
) -> Result<ModuleOutput, PipelineError> {
    let output = match analysis {
        Analysis::Metrics => ModuleOutput::Metrics(CohesionSummary::from_graph(&module.dependency_graph())),
        Analysis::Dependencies => {
            ModuleOutput::Dependencies(DependencyListing::from_graph(&module.dependency_graph()))
        }
        Analysis::Graph { out_dir } => {
            let path = render_graph(&module.dependency_graph(), &config.graph, out_dir, &module.path)?;
            ModuleOutput::Graph { path }
        }
        Analysis::Stats => {
            let mut stats = DeclarationStats::default();
            for file in &module.files {
                stats += DeclarationStats::from_tree(file.root());
            }
            ModuleOutput::Stats(stats)
        }
        Analysis::Format => {
            let indent = config.format.effective_indent();
            let listing = module
                .files
                .iter()
                .map(|file| dump_tree(file.root(), &file.source, indent))
                .collect();
            ModuleOutput::Format { listing }
        }
    };
    Ok(output)
}

/// Run `analysis` on every module below `root`.
///
/// Only a root that cannot be walked is fatal. Failures of single modules
/// are collected in the result, and modules not yet started when `cancel`
/// trips are abandoned.
pub fn run(
    root: &Path,
    config: &CohesionConfig,
    analysis: &Analysis,
    cancel: &CancellationToken,
) -> Result<PipelineResult<Vec<ModuleReport>>, LoadError> {
    let span = tracing::info_span!(
        "analysis_run",
        root = %root.display(),
        analysis = analysis.name(),
        modules_discovered = Empty,
    );
    let _entered = span.enter();

    let loader = ModuleLoader::new(root, config.scan.clone())?;
    let candidates = loader.discover()?;
    span.record(metrics::MODULES_DISCOVERED, candidates.len());

    let mut index = GoModIndex::new();
    let jobs: Vec<(ModuleCandidate, Option<String>)> = candidates
        .into_iter()
        .map(|candidate| {
            let import_path = index.import_path(loader.root(), &candidate.dir);
            (candidate, import_path)
        })
        .collect();

    let analyze_all = || -> Vec<Vec<Result<ModuleReport, PipelineError>>> {
        jobs.par_iter()
            .map(|(candidate, import_path)| {
                analyze_candidate(&loader, candidate, import_path.as_deref(), config, analysis, cancel)
            })
            .collect()
    };
    let outcomes = match config.scan.effective_threads() {
        0 => analyze_all(),
        threads => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(analyze_all),
            Err(e) => {
                tracing::warn!(threads, error = %e, "cannot build thread pool, using the global one");
                analyze_all()
            }
        },
    };

    let mut result = PipelineResult::<Vec<ModuleReport>>::default();
    let mut abandoned = 0usize;
    for outcome in outcomes.into_iter().flatten() {
        match outcome {
            Ok(report) => result.data.push(report),
            Err(PipelineError::Cancelled) => abandoned += 1,
            Err(e) => result.add_error(e),
        }
    }
    if abandoned > 0 {
        tracing::warn!(abandoned, "run cancelled");
        result.add_error(PipelineError::Cancelled);
    }

    tracing::info!(
        modules = result.data.len(),
        errors = result.error_count(),
        "analysis finished"
    );
    Ok(result)
}

fn analyze_candidate(
    loader: &ModuleLoader,
    candidate: &ModuleCandidate,
    import_path: Option<&str>,
    config: &CohesionConfig,
    analysis: &Analysis,
    cancel: &CancellationToken,
) -> Vec<Result<ModuleReport, PipelineError>> {
    if cancel.is_cancelled() {
        return vec![Err(PipelineError::Cancelled)];
    }
    let modules = match loader.load(candidate, import_path) {
        Ok(modules) => modules,
        Err(e) => {
            tracing::warn!(dir = %candidate.dir.display(), error = %e, "module failed to load");
            return vec![Err(e.into())];
        }
    };
    modules
        .iter()
        .map(|module| {
            let output = analyze_module(module, config, analysis)?;
            Ok(ModuleReport {
                path: module.path.clone(),
                name: module.name.clone(),
                syntax_errors: module.syntax_errors(),
                output,
            })
        })
        .collect()
}
