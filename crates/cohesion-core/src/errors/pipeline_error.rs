//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, CohesionErrorCode};
use super::{LoadError, RenderError};

/// Per-module failures collected during a run over many modules.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Run cancelled")]
    Cancelled,
}

impl CohesionErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Load(e) => e.error_code(),
            Self::Render(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some modules fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_string_uses_inner_code() {
        let err = PipelineError::from(LoadError::ConflictingPackages {
            dir: "pkg".into(),
            first: "a".to_string(),
            second: "b".to_string(),
        });
        assert_eq!(err.error_code(), error_code::PACKAGE_CONFLICT);
        assert!(err.coded_string().starts_with("[PACKAGE_CONFLICT] Load error:"));
    }

    #[test]
    fn pipeline_result_collects_errors() {
        let mut result: PipelineResult<Vec<u32>> = PipelineResult::new(vec![1]);
        assert!(result.is_clean());
        result.add_error(PipelineError::Cancelled);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.data, vec![1]);
    }
}
