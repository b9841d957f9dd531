//! Depth-first walk that turns resolved references into graph edges.

use tree_sitter::Node;

use super::graph::DependencyGraph;
use crate::semantics::syntax::{is_binding_declaration, is_expression, named_children};
use crate::semantics::{FileId, SymbolId, SymbolResolver};

/// Builds the dependency graph of one module.
///
/// Every module-local definition is seeded as a node up front, so symbols
/// that reference nothing and are referenced by nothing still count. The
/// walk then binds the nearest enclosing function, method or type and adds
/// an edge to every module-local symbol referenced beneath it.
pub struct CohesionVisitor<'r, R: SymbolResolver> {
    resolver: &'r R,
    graph: DependencyGraph,
    resolution_failures: usize,
}

impl<'r, R: SymbolResolver> CohesionVisitor<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        let mut graph = DependencyGraph::new();
        for id in resolver.definitions() {
            if resolver.is_module_local(id) {
                graph.ensure_node(resolver.symbol(id));
            }
        }
        Self {
            resolver,
            graph,
            resolution_failures: 0,
        }
    }

    /// Walk one file's syntax tree.
    pub fn visit_file(&mut self, file: FileId, root: Node<'_>) {
        self.visit(file, root, None);
    }

    /// Expressions skipped because they could not be resolved.
    pub fn resolution_failures(&self) -> usize {
        self.resolution_failures
    }

    pub fn finish(self) -> DependencyGraph {
        self.graph
    }

    /// Depth-first, over an explicit stack.
    fn visit(&mut self, file: FileId, root: Node<'_>, enclosing: Option<SymbolId>) {
        let mut pending = vec![(root, enclosing)];
        while let Some((node, enclosing)) = pending.pop() {
            let enclosing = if is_binding_declaration(node.kind()) {
                self.bind(file, node).or(enclosing)
            } else {
                enclosing
            };

            if is_expression(node.kind()) {
                match self.resolver.resolve_expression(file, node) {
                    Ok(referenced) => {
                        if let Some(from) = enclosing {
                            self.link(from, &referenced);
                        }
                        continue;
                    }
                    Err(failure) => {
                        self.resolution_failures += 1;
                        let start = node.start_position();
                        tracing::debug!(
                            %failure,
                            kind = node.kind(),
                            line = start.row + 1,
                            column = start.column + 1,
                            "unresolved expression, descending into its parts"
                        );
                    }
                }
            }

            let children = named_children(node);
            pending.extend(children.into_iter().rev().map(|child| (child, enclosing)));
        }
    }

    /// Module-local symbol declared by a function, method or type node.
    fn bind(&self, file: FileId, node: Node<'_>) -> Option<SymbolId> {
        let name = node.child_by_field_name("name")?;
        self.resolver
            .resolve_definition(file, name)
            .filter(|id| self.resolver.is_module_local(*id))
    }

    fn link(&mut self, from: SymbolId, referenced: &[SymbolId]) {
        let resolver = self.resolver;
        let source = resolver.symbol(from);
        for &id in referenced {
            if resolver.is_module_local(id) {
                self.graph.add_edge(source, resolver.symbol(id));
            }
        }
    }
}

/// Build the dependency graph of a module from its file roots, in file order.
pub fn build_graph<R: SymbolResolver>(resolver: &R, roots: &[Node<'_>]) -> (DependencyGraph, usize) {
    let mut visitor = CohesionVisitor::new(resolver);
    for (idx, root) in roots.iter().enumerate() {
        let Ok(file) = u32::try_from(idx) else {
            tracing::warn!(files = roots.len(), "file ids exhausted, remaining files skipped");
            break;
        };
        visitor.visit_file(FileId(file), *root);
    }
    let failures = visitor.resolution_failures();
    (visitor.finish(), failures)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cohesion_core::types::collections::SmallVec4;

    use super::*;
    use crate::parsers::parse_go;
    use crate::semantics::{DeclScope, ResolutionFailure, Symbol, SymbolKind};

    /// Resolver stub: `a` references `b` in every expression, nothing fails.
    struct FixedResolver {
        symbols: Vec<Arc<Symbol>>,
    }

    impl FixedResolver {
        fn new() -> Self {
            let make = |name: &str, offset: u64, scope: DeclScope| {
                Arc::new(Symbol {
                    package_path: Some("m".to_string()),
                    name: name.to_string(),
                    kind: SymbolKind::Func,
                    scope,
                    position: None,
                    offset,
                })
            };
            Self {
                symbols: vec![
                    make("a", 19, DeclScope::Package),
                    make("b", 37, DeclScope::Package),
                ],
            }
        }
    }

    impl SymbolResolver for FixedResolver {
        fn module_path(&self) -> &str {
            "m"
        }

        fn symbol(&self, id: SymbolId) -> &Arc<Symbol> {
            &self.symbols[id.index()]
        }

        fn definitions(&self) -> impl Iterator<Item = SymbolId> + '_ {
            (0..self.symbols.len()).map(|i| SymbolId(i as u32))
        }

        fn resolve_definition(&self, _file: FileId, ident: Node<'_>) -> Option<SymbolId> {
            match ident.start_byte() {
                19 => Some(SymbolId(0)),
                37 => Some(SymbolId(1)),
                _ => None,
            }
        }

        fn resolve_expression(
            &self,
            _file: FileId,
            _expr: Node<'_>,
        ) -> Result<SmallVec4<SymbolId>, ResolutionFailure> {
            Ok(SmallVec4::from_slice(&[SymbolId(1)]))
        }
    }

    #[test]
    fn seeds_and_links_through_the_resolver_seam() {
        // `a` starts at byte 19, `b` at byte 37.
        let src = "package m\n\nfunc    a() { b() }\n\nfunc b() {}\n";
        let parsed = parse_go(src, std::path::Path::new("m.go")).unwrap();
        let resolver = FixedResolver::new();
        let (graph, failures) = build_graph(&resolver, &[parsed.tree.root_node()]);
        assert_eq!(failures, 0);
        assert_eq!(graph.node_count(), 2);
        // b -> b would be a self-loop and is dropped.
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.contains_edge(&resolver.symbols[0], &resolver.symbols[1]));
    }
}
