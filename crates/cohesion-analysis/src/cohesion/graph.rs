//! Dependency graph over module-local symbols.

use std::sync::Arc;

use cohesion_core::types::collections::FxHashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::identity::identity;
use crate::semantics::Symbol;

/// A graph node: one module-local symbol and its identity.
#[derive(Debug, Clone)]
pub struct SymbolNode {
    pub identity: u64,
    pub symbol: Arc<Symbol>,
}

/// Directed graph of references between the symbols of one module.
///
/// At most one node per identity, no self-loops, at most one edge per
/// ordered pair. Nodes are never removed.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<SymbolNode, ()>,
    index: FxHashMap<u64, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for `symbol`, created on first sight.
    pub fn ensure_node(&mut self, symbol: &Arc<Symbol>) -> NodeIndex {
        let id = identity(symbol);
        if let Some(&existing) = self.index.get(&id) {
            let kept = &self.graph[existing].symbol;
            if !Arc::ptr_eq(kept, symbol) && **kept != **symbol {
                tracing::warn!(
                    identity = id,
                    kept = %kept.name,
                    dropped = %symbol.name,
                    "identity collision, keeping the first symbol"
                );
            }
            return existing;
        }
        let idx = self.graph.add_node(SymbolNode {
            identity: id,
            symbol: Arc::clone(symbol),
        });
        self.index.insert(id, idx);
        idx
    }

    /// Record that `from` references `to`. Returns whether the edge is new.
    pub fn add_edge(&mut self, from: &Arc<Symbol>, to: &Arc<Symbol>) -> bool {
        if identity(from) == identity(to) {
            return false;
        }
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        if a == b || self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &SymbolNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Targets of the edges leaving `node`.
    pub fn out_edges(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, &SymbolNode)> + '_ {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node by identity.
    pub fn node(&self, identity: u64) -> Option<NodeIndex> {
        self.index.get(&identity).copied()
    }

    pub fn contains_edge(&self, from: &Symbol, to: &Symbol) -> bool {
        match (self.node(identity(from)), self.node(identity(to))) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Nodes ordered by declaration: file, then offset.
    pub fn sorted_nodes(&self) -> Vec<(NodeIndex, &SymbolNode)> {
        let mut nodes: Vec<_> = self.nodes().collect();
        nodes.sort_by(|(_, a), (_, b)| declaration_order(&a.symbol, &b.symbol));
        nodes
    }

    /// Targets of `node`'s edges in declaration order.
    pub fn sorted_out_edges(&self, node: NodeIndex) -> Vec<(NodeIndex, &SymbolNode)> {
        let mut targets: Vec<_> = self.out_edges(node).collect();
        targets.sort_by(|(_, a), (_, b)| declaration_order(&a.symbol, &b.symbol));
        targets
    }

    /// The underlying petgraph graph, for algorithms.
    pub fn inner(&self) -> &DiGraph<SymbolNode, ()> {
        &self.graph
    }
}

fn declaration_order(a: &Symbol, b: &Symbol) -> std::cmp::Ordering {
    a.offset
        .cmp(&b.offset)
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::{DeclScope, SymbolKind};

    fn sym(name: &str, offset: u64) -> Arc<Symbol> {
        Arc::new(Symbol {
            package_path: Some("m".to_string()),
            name: name.to_string(),
            kind: SymbolKind::Func,
            scope: DeclScope::Package,
            position: None,
            offset,
        })
    }

    #[test]
    fn ensure_node_is_idempotent() {
        let mut g = DependencyGraph::new();
        let a = sym("a", 1);
        let first = g.ensure_node(&a);
        let second = g.ensure_node(&a);
        let equal_copy = g.ensure_node(&Arc::new((*a).clone()));
        assert_eq!(first, second);
        assert_eq!(first, equal_copy);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn add_edge_rejects_self_loops_and_duplicates() {
        let mut g = DependencyGraph::new();
        let (a, b) = (sym("a", 1), sym("b", 20));
        assert!(!g.add_edge(&a, &a));
        assert_eq!(g.node_count(), 0);
        assert!(g.add_edge(&a, &b));
        assert!(!g.add_edge(&a, &b));
        assert!(g.add_edge(&b, &a));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2);
        assert!(g.contains_edge(&a, &b));
    }

    #[test]
    fn sorted_nodes_follow_declaration_offsets() {
        let mut g = DependencyGraph::new();
        g.ensure_node(&sym("late", 90));
        g.ensure_node(&sym("early", 5));
        let names: Vec<_> = g
            .sorted_nodes()
            .into_iter()
            .map(|(_, n)| n.symbol.name.clone())
            .collect();
        assert_eq!(names, vec!["early", "late"]);
    }
}
