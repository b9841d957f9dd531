use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cohesion_analysis::Analysis;
use cohesion_core::config::CliOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "cohesion",
    version,
    about = "Cohesion metrics for Go packages",
    long_about = "Builds a graph of references between the functions, methods, types and \
                  package-level variables of each Go package and reports how tightly it hangs together."
)]
pub struct CohesionCli {
    /// Config file to use instead of `cohesion.toml` in the analyzed directory
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Worker threads for per-package analysis (0 means one per core)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Load `_test.go` files as well
    #[arg(long, global = true)]
    pub include_tests: bool,

    /// Print one JSON document for the whole run
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connected components, average degree and density per package
    Metrics {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Each symbol followed by the symbols it references
    #[command(alias = "deps")]
    Dependencies {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Draw each package's graph as an SVG image
    Graph {
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Directory the images are written to
        #[arg(short, long, default_value = "graphs")]
        output: PathBuf,
    },
    /// Count function, type, const and var declarations
    Stats {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Print the syntax tree of every file
    Format {
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Indentation added per tree level
        #[arg(short, long)]
        indent: Option<String>,
    },
}

impl Commands {
    pub fn dir(&self) -> &Path {
        match self {
            Self::Metrics { dir }
            | Self::Dependencies { dir }
            | Self::Graph { dir, .. }
            | Self::Stats { dir }
            | Self::Format { dir, .. } => dir,
        }
    }

    pub fn analysis(&self) -> Analysis {
        match self {
            Self::Metrics { .. } => Analysis::Metrics,
            Self::Dependencies { .. } => Analysis::Dependencies,
            Self::Graph { output, .. } => Analysis::Graph {
                out_dir: output.clone(),
            },
            Self::Stats { .. } => Analysis::Stats,
            Self::Format { .. } => Analysis::Format,
        }
    }
}

impl CohesionCli {
    pub fn overrides(&self) -> CliOverrides {
        let format_indent = match &self.command {
            Commands::Format { indent, .. } => indent.clone(),
            _ => None,
        };
        CliOverrides {
            config_file: self.config.clone(),
            scan_threads: self.threads,
            scan_include_tests: self.include_tests.then_some(true),
            format_indent,
        }
    }
}
