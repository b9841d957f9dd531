//! Symbols denoted by Go identifiers.

use std::fmt;

use serde::Serialize;

/// Index of a symbol in a module's symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a source file within its module, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of entity a symbol denotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    Func,
    /// Concrete or interface method; `receiver` is the base type name.
    Method { receiver: String },
    Type,
    /// Type parameter of a generic declaration.
    TypeParam,
    Var,
    Const,
    Package,
    Builtin,
}

/// Block in which a symbol was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclScope {
    Universe,
    Package,
    File,
    Local,
}

/// Source position of a declaring identifier. Line and column are 1-based,
/// the column counts bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A declared program entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Symbol {
    /// Import path of the declaring package; `None` for predeclared entities.
    pub package_path: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub kind: SymbolKind,
    pub scope: DeclScope,
    pub position: Option<Position>,
    /// Module-global byte offset of the declaring identifier.
    pub offset: u64,
}

impl Symbol {
    /// Whether this symbol is a node of interest for the module at `module_path`.
    ///
    /// Variables and constants qualify only at package level; functions,
    /// methods and named types qualify when declared by the module itself,
    /// including named types local to a function body.
    pub fn is_module_local(&self, module_path: &str) -> bool {
        if self.name.is_empty() || self.name == "_" {
            return false;
        }
        match self.kind {
            SymbolKind::Var | SymbolKind::Const => self.scope == DeclScope::Package,
            SymbolKind::Func | SymbolKind::Method { .. } | SymbolKind::Type => {
                self.package_path.as_deref() == Some(module_path)
            }
            SymbolKind::TypeParam | SymbolKind::Package | SymbolKind::Builtin => false,
        }
    }

    /// `file:line:column`, or `-` for symbols without a source position.
    pub fn position_string(&self) -> String {
        self.position
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(kind: SymbolKind, scope: DeclScope, path: Option<&str>) -> Symbol {
        Symbol {
            package_path: path.map(str::to_string),
            name: "x".to_string(),
            kind,
            scope,
            position: None,
            offset: 0,
        }
    }

    #[test]
    fn vars_and_consts_need_package_scope() {
        let pkg = Some("example.com/m");
        assert!(symbol(SymbolKind::Var, DeclScope::Package, pkg).is_module_local("example.com/m"));
        assert!(!symbol(SymbolKind::Var, DeclScope::Local, pkg).is_module_local("example.com/m"));
        assert!(symbol(SymbolKind::Const, DeclScope::Package, pkg).is_module_local("example.com/m"));
    }

    #[test]
    fn funcs_and_types_need_matching_package_path() {
        let local = symbol(SymbolKind::Func, DeclScope::Package, Some("a"));
        assert!(local.is_module_local("a"));
        assert!(!local.is_module_local("b"));
        let local_type = symbol(SymbolKind::Type, DeclScope::Local, Some("a"));
        assert!(local_type.is_module_local("a"));
    }

    #[test]
    fn predeclared_and_blank_never_local() {
        assert!(!symbol(SymbolKind::Builtin, DeclScope::Universe, None).is_module_local("a"));
        let mut blank = symbol(SymbolKind::Var, DeclScope::Package, Some("a"));
        blank.name = "_".to_string();
        assert!(!blank.is_module_local("a"));
    }

    #[test]
    fn position_renders_file_line_column() {
        let mut s = symbol(SymbolKind::Func, DeclScope::Package, Some("a"));
        assert_eq!(s.position_string(), "-");
        s.position = Some(Position {
            file: "/src/a.go".to_string(),
            line: 3,
            column: 6,
        });
        assert_eq!(s.position_string(), "/src/a.go:3:6");
    }
}
