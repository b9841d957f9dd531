//! Graph rendering errors.

use std::path::PathBuf;

use super::error_code::{self, CohesionErrorCode};

/// Errors that can occur while laying out or drawing a dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Drawing {path} failed: {message}")]
    Drawing { path: PathBuf, message: String },
}

impl CohesionErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        error_code::RENDER_ERROR
    }
}
