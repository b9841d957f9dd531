//! Resolved symbol table of one module.

use std::collections::BTreeMap;
use std::sync::Arc;

use cohesion_core::types::collections::{FxHashMap, SmallVec4};
use tree_sitter::Node;

use super::resolver::Resolver;
use super::symbols::{DeclScope, FileId, Symbol, SymbolId};
use super::{ResolutionFailure, SourceUnit, SymbolResolver};

/// What an identifier use denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Use {
    Symbol(SymbolId),
    Predeclared,
    /// An imported package or one of its members.
    External,
    /// A struct field or a member of a type we could not determine.
    Opaque,
    Unresolved(Box<str>),
    /// A subtree past the resolver's nesting limit, left unresolved.
    TooDeep { line: u32, column: u32 },
}

/// Location of a declaring identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub file: FileId,
    pub start: usize,
}

/// Symbols declared by a module plus every identifier use in its files.
#[derive(Debug, Default)]
pub struct ModuleSemantics {
    module_path: String,
    symbols: Vec<Arc<Symbol>>,
    defs: FxHashMap<NodeKey, SymbolId>,
    uses: Vec<BTreeMap<usize, Use>>,
}

impl ModuleSemantics {
    /// Resolve every file of the module at `module_path`.
    pub fn resolve(module_path: &str, units: &[SourceUnit<'_>]) -> Self {
        Resolver::new(module_path, units).run()
    }

    pub(crate) fn from_parts(
        module_path: String,
        symbols: Vec<Arc<Symbol>>,
        defs: FxHashMap<NodeKey, SymbolId>,
        uses: Vec<BTreeMap<usize, Use>>,
    ) -> Self {
        Self {
            module_path,
            symbols,
            defs,
            uses,
        }
    }

    pub fn symbols(&self) -> &[Arc<Symbol>] {
        &self.symbols
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// First package-level symbol with the given name.
    pub fn package_symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.scope == DeclScope::Package && s.name == name)
            .map(|i| SymbolId(i as u32))
    }

    /// Symbol denoted by the identifier starting at `start_byte`, if resolved.
    pub fn symbol_at(&self, file: FileId, start_byte: usize) -> Option<SymbolId> {
        match self.uses.get(file.index())?.get(&start_byte)? {
            Use::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// Identifier uses that resolved to nothing.
    pub fn unresolved_count(&self) -> usize {
        self.uses
            .iter()
            .flat_map(|file| file.values())
            .filter(|u| matches!(u, Use::Unresolved(_)))
            .count()
    }
}

impl SymbolResolver for ModuleSemantics {
    fn module_path(&self) -> &str {
        &self.module_path
    }

    fn symbol(&self, id: SymbolId) -> &Arc<Symbol> {
        &self.symbols[id.index()]
    }

    fn definitions(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).map(|i| SymbolId(i as u32))
    }

    fn resolve_definition(&self, file: FileId, ident: Node<'_>) -> Option<SymbolId> {
        self.defs
            .get(&NodeKey {
                file,
                start: ident.start_byte(),
            })
            .copied()
    }

    fn resolve_expression(
        &self,
        file: FileId,
        expr: Node<'_>,
    ) -> Result<SmallVec4<SymbolId>, ResolutionFailure> {
        if expr.has_error() {
            let start = expr.start_position();
            return Err(ResolutionFailure::Syntax {
                line: start.row as u32 + 1,
                column: start.column as u32 + 1,
            });
        }

        let mut found = SmallVec4::new();
        let Some(uses) = self.uses.get(file.index()) else {
            return Ok(found);
        };
        for (_, denoted) in uses.range(expr.start_byte()..expr.end_byte()) {
            match denoted {
                Use::Symbol(id) => {
                    if !found.contains(id) {
                        found.push(*id);
                    }
                }
                Use::Unresolved(name) => {
                    return Err(ResolutionFailure::Undefined {
                        name: name.to_string(),
                    })
                }
                Use::TooDeep { line, column } => {
                    return Err(ResolutionFailure::TooDeep {
                        line: *line,
                        column: *column,
                    })
                }
                Use::Predeclared | Use::External | Use::Opaque => {}
            }
        }
        Ok(found)
    }
}
