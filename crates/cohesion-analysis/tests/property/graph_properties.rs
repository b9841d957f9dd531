use std::sync::Arc;

use cohesion_analysis::cohesion::{average_degree, connected_components, density, DependencyGraph};
use cohesion_analysis::semantics::{DeclScope, Symbol, SymbolKind};
use proptest::prelude::*;

fn symbols(count: usize) -> Vec<Arc<Symbol>> {
    (0..count)
        .map(|i| {
            Arc::new(Symbol {
                package_path: Some("example.com/p".to_string()),
                name: format!("s{i}"),
                kind: SymbolKind::Func,
                scope: DeclScope::Package,
                position: None,
                offset: i as u64 * 16,
            })
        })
        .collect()
}

fn build(count: usize, edges: &[(usize, usize)]) -> (Vec<Arc<Symbol>>, DependencyGraph) {
    let syms = symbols(count);
    let mut graph = DependencyGraph::new();
    for s in &syms {
        graph.ensure_node(s);
    }
    for &(a, b) in edges {
        graph.add_edge(&syms[a % count], &syms[b % count]);
    }
    (syms, graph)
}

proptest! {
    #[test]
    fn no_self_loops_and_no_duplicate_edges(
        count in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
    ) {
        let (syms, graph) = build(count, &edges);
        prop_assert_eq!(graph.node_count(), count);
        for s in &syms {
            prop_assert!(!graph.contains_edge(s, s));
        }
        let mut pairs: Vec<(usize, usize)> = edges
            .iter()
            .map(|&(a, b)| (a % count, b % count))
            .filter(|(a, b)| a != b)
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        prop_assert_eq!(graph.edge_count(), pairs.len());
    }

    #[test]
    fn adding_edges_again_changes_nothing(
        count in 1usize..10,
        edges in prop::collection::vec((0usize..10, 0usize..10), 0..30),
    ) {
        let (syms, mut graph) = build(count, &edges);
        let (nodes, total) = (graph.node_count(), graph.edge_count());
        for &(a, b) in &edges {
            prop_assert!(!graph.add_edge(&syms[a % count], &syms[b % count]));
            graph.ensure_node(&syms[a % count]);
        }
        prop_assert_eq!(graph.node_count(), nodes);
        prop_assert_eq!(graph.edge_count(), total);
    }

    #[test]
    fn components_are_bounded_by_node_count(
        count in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..30),
    ) {
        let (_, graph) = build(count, &edges);
        let components = connected_components(&graph);
        prop_assert!(components >= 1);
        prop_assert!(components <= count);
        if graph.edge_count() == 0 {
            prop_assert_eq!(components, count);
        }
    }

    #[test]
    fn forward_only_edges_keep_density_within_unit_range(
        count in 2usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
    ) {
        // Edges only from lower to higher index, so no pair is mutual.
        let forward: Vec<(usize, usize)> = edges
            .iter()
            .map(|&(a, b)| {
                let (a, b) = (a % count, b % count);
                (a.min(b), a.max(b))
            })
            .collect();
        let (_, graph) = build(count, &forward);
        let d = density(&graph).unwrap();
        prop_assert!((0.0..=1.0).contains(&d));
        let avg = average_degree(&graph).unwrap();
        prop_assert!((avg - graph.edge_count() as f64 / count as f64).abs() < 1e-12);
    }

    #[test]
    fn density_is_degenerate_below_two_nodes(count in 0usize..2) {
        let (_, graph) = build(count.max(1), &[]);
        let graph = if count == 0 { DependencyGraph::new() } else { graph };
        prop_assert!(density(&graph).is_err());
    }
}
