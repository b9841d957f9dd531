//! Metric errors.

use super::error_code::{self, CohesionErrorCode};

/// Raised when a cohesion metric is mathematically undefined for the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    #[error("{metric} is undefined for a graph with {nodes} node(s)")]
    Degenerate { metric: &'static str, nodes: usize },
}

impl CohesionErrorCode for MetricError {
    fn error_code(&self) -> &'static str {
        error_code::DEGENERATE_METRIC
    }
}
