//! Textual dependency listing: each node followed by the nodes it references.

use std::fmt;

use serde::Serialize;

use crate::cohesion::DependencyGraph;
use crate::semantics::Symbol;

/// A symbol as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedSymbol {
    /// `file:line:column`, or `-` without a position.
    pub position: String,
    pub name: String,
}

impl From<&Symbol> for ListedSymbol {
    fn from(symbol: &Symbol) -> Self {
        Self {
            position: symbol.position_string(),
            name: symbol.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedNode {
    #[serde(flatten)]
    pub symbol: ListedSymbol,
    pub references: Vec<ListedSymbol>,
}

/// Every node of a graph with its outgoing edges, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DependencyListing {
    pub nodes: Vec<ListedNode>,
}

impl DependencyListing {
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let nodes = graph
            .sorted_nodes()
            .into_iter()
            .map(|(idx, node)| ListedNode {
                symbol: ListedSymbol::from(node.symbol.as_ref()),
                references: graph
                    .sorted_out_edges(idx)
                    .into_iter()
                    .map(|(_, target)| ListedSymbol::from(target.symbol.as_ref()))
                    .collect(),
            })
            .collect();
        Self { nodes }
    }
}

impl fmt::Display for DependencyListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{} {}", node.symbol.position, node.symbol.name)?;
            for target in &node.references {
                writeln!(f, "\t{} {}", target.position, target.name)?;
            }
        }
        Ok(())
    }
}
