//! Declaration counts of a module.

use std::fmt;
use std::ops::AddAssign;

use serde::Serialize;
use tree_sitter::Node;

/// Funcs count function and method declarations; consts and vars count
/// declarations, not names, at any nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeclarationStats {
    pub funcs: usize,
    pub types: usize,
    pub consts: usize,
    pub vars: usize,
}

impl DeclarationStats {
    /// Counts for one file's syntax tree.
    pub fn from_tree(root: Node<'_>) -> Self {
        let mut stats = Self::default();
        let mut cursor = root.walk();
        // Pre-order walk without recursion.
        loop {
            stats.count(cursor.node().kind());
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return stats;
                }
            }
        }
    }

    fn count(&mut self, kind: &str) {
        match kind {
            "function_declaration" | "method_declaration" => self.funcs += 1,
            "type_spec" | "type_alias" => self.types += 1,
            "const_declaration" => self.consts += 1,
            "var_declaration" => self.vars += 1,
            _ => {}
        }
    }
}

impl AddAssign for DeclarationStats {
    fn add_assign(&mut self, rhs: Self) {
        self.funcs += rhs.funcs;
        self.types += rhs.types;
        self.consts += rhs.consts;
        self.vars += rhs.vars;
    }
}

impl fmt::Display for DeclarationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Funcs: {}", self.funcs)?;
        writeln!(f, "Types: {}", self.types)?;
        writeln!(f, "Consts: {}", self.consts)?;
        writeln!(f, "Vars: {}", self.vars)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parsers::parse_go;

    const SRC: &str = r#"package p

const (
	A = 1
	B = 2
)

const C = 3

var x, y int

type (
	T struct{}
	U = T
)

func (T) M() {}

func f() {
	var local int
	type inner int
	g := func() {}
	_, _ = local, g
}
"#;

    #[test]
    fn counts_declarations_not_names() {
        let parsed = parse_go(SRC, Path::new("p.go")).unwrap();
        let stats = DeclarationStats::from_tree(parsed.tree.root_node());
        assert_eq!(
            stats,
            DeclarationStats {
                funcs: 2,
                types: 3,
                consts: 2,
                vars: 2,
            }
        );
        assert_eq!(stats.to_string(), "Funcs: 2\nTypes: 3\nConsts: 2\nVars: 2\n");
    }

    #[test]
    fn sums_across_files() {
        let mut total = DeclarationStats::default();
        total += DeclarationStats { funcs: 1, ..Default::default() };
        total += DeclarationStats { funcs: 2, vars: 1, ..Default::default() };
        assert_eq!(total.funcs, 3);
        assert_eq!(total.vars, 1);
    }
}
