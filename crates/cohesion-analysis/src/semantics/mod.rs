//! Go name resolution over tree-sitter syntax trees.
//!
//! A module is resolved once, up front: every identifier use is classified
//! and stored by byte offset, so later queries are range lookups.

mod members;
pub mod predeclared;
mod resolver;
pub(crate) mod scope;
pub mod symbols;
pub(crate) mod syntax;
mod table;

use std::sync::Arc;

use cohesion_core::errors::error_code::{self, CohesionErrorCode};
use cohesion_core::types::collections::SmallVec4;
use tree_sitter::{Node, Tree};

pub use symbols::{DeclScope, FileId, Position, Symbol, SymbolId, SymbolKind};
pub use table::ModuleSemantics;

/// One parsed file as seen by the resolver.
#[derive(Clone, Copy)]
pub struct SourceUnit<'a> {
    /// Path used in symbol positions.
    pub display_path: &'a str,
    pub source: &'a str,
    pub tree: &'a Tree,
    /// Module-global offset of the file's first byte.
    pub base_offset: u64,
}

/// An expression whose symbols cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("syntax error within expression at {line}:{column}")]
    Syntax { line: u32, column: u32 },

    #[error("undefined: {name}")]
    Undefined { name: String },

    #[error("expression nested too deeply at {line}:{column}")]
    TooDeep { line: u32, column: u32 },
}

impl CohesionErrorCode for ResolutionFailure {
    fn error_code(&self) -> &'static str {
        error_code::RESOLUTION_FAILURE
    }
}

/// Semantic queries consumed by the cohesion visitor.
pub trait SymbolResolver {
    /// Import path of the module being analyzed.
    fn module_path(&self) -> &str;

    fn symbol(&self, id: SymbolId) -> &Arc<Symbol>;

    /// Every symbol defined by the module's source, in declaration order.
    fn definitions(&self) -> impl Iterator<Item = SymbolId> + '_;

    /// Symbol introduced by a declaring identifier, if any.
    fn resolve_definition(&self, file: FileId, ident: Node<'_>) -> Option<SymbolId>;

    /// Distinct symbols referenced anywhere inside `expr`.
    fn resolve_expression(
        &self,
        file: FileId,
        expr: Node<'_>,
    ) -> Result<SmallVec4<SymbolId>, ResolutionFailure>;

    fn is_module_local(&self, id: SymbolId) -> bool {
        self.symbol(id).is_module_local(self.module_path())
    }
}
