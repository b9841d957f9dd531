//! Module loader errors.

use std::path::PathBuf;

use super::error_code::{self, CohesionErrorCode};

/// Errors raised while discovering, reading or parsing Go packages.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Walk error under {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Tree-sitter could not parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Found packages {first} and {second} in {dir}")]
    ConflictingPackages {
        dir: PathBuf,
        first: String,
        second: String,
    },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },
}

impl CohesionErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RootNotFound { .. } => error_code::ROOT_NOT_FOUND,
            Self::Parse { .. } => error_code::PARSE_ERROR,
            Self::ConflictingPackages { .. } => error_code::PACKAGE_CONFLICT,
            _ => error_code::LOAD_ERROR,
        }
    }
}
