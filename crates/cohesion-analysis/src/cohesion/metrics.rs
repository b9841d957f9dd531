//! Cohesion metrics over a finished dependency graph.

use cohesion_core::errors::MetricError;
use serde::Serialize;

use super::graph::DependencyGraph;

/// Weakly connected components: edge direction ignored, isolated nodes
/// count as their own component. Zero only for an empty graph.
pub fn connected_components(graph: &DependencyGraph) -> usize {
    petgraph::algo::connected_components(graph.inner())
}

/// Mean out-degree, E / N.
pub fn average_degree(graph: &DependencyGraph) -> Result<f64, MetricError> {
    let nodes = graph.node_count();
    if nodes == 0 {
        return Err(MetricError::Degenerate {
            metric: "average degree",
            nodes,
        });
    }
    Ok(graph.edge_count() as f64 / nodes as f64)
}

/// E / (N(N-1)/2). The bound is the undirected pair count, so a graph
/// with mutual references can exceed 1.
pub fn density(graph: &DependencyGraph) -> Result<f64, MetricError> {
    let nodes = graph.node_count();
    if nodes <= 1 {
        return Err(MetricError::Degenerate {
            metric: "density",
            nodes,
        });
    }
    let pairs = (nodes * (nodes - 1)) as f64 / 2.0;
    Ok(graph.edge_count() as f64 / pairs)
}

/// The three metrics of one module, degenerate values as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohesionSummary {
    pub nodes: usize,
    pub edges: usize,
    pub connected_components: usize,
    pub average_degree: Option<f64>,
    pub density: Option<f64>,
}

impl CohesionSummary {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            connected_components: connected_components(graph),
            average_degree: average_degree(graph).ok(),
            density: density(graph).ok(),
        }
    }
}
