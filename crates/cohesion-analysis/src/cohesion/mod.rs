//! Cohesion graph builder: identities, the dependency graph, the visitor
//! that populates it, and the metrics read from it.

pub mod graph;
pub mod identity;
pub mod metrics;
pub mod visitor;

pub use graph::{DependencyGraph, SymbolNode};
pub use identity::identity;
pub use metrics::{average_degree, connected_components, density, CohesionSummary};
pub use visitor::{build_graph, CohesionVisitor};
