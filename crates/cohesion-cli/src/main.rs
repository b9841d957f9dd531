//! `cohesion`: per-package cohesion reports for Go source trees.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use cohesion_analysis::pipeline;
use cohesion_analysis::reports::to_json_string;
use cohesion_core::config::CohesionConfig;
use cohesion_core::errors::{CohesionErrorCode, PipelineError};
use cohesion_core::tracing::init_tracing;
use cohesion_core::traits::{Cancellable, CancellationToken};

use crate::cli::CohesionCli;

fn main() -> ExitCode {
    init_tracing();
    let cli = CohesionCli::parse();
    let dir = cli.command.dir().to_path_buf();

    let config = match CohesionConfig::load(&dir, Some(&cli.overrides())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.coded_string());
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || on_interrupt.cancel()) {
        tracing::warn!(error = %e, "cannot install Ctrl-C handler");
    }

    let result = match pipeline::run(&dir, &config, &cli.command.analysis(), &cancel) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e.coded_string());
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match to_json_string(&result) {
            Ok(document) => println!("{document}"),
            Err(e) => {
                eprintln!("failed to encode JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for report in &result.data {
            println!("{}", report.path);
            print!("{}", report.output);
            println!();
        }
        for error in &result.errors {
            eprintln!("{}", error.coded_string());
        }
    }

    if result.errors.iter().any(|e| matches!(e, PipelineError::Cancelled)) {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
