//! Indented listing of a syntax tree, one named node per line.

use std::fmt::Write;

use tree_sitter::Node;

use crate::semantics::syntax::{named_children, text};

/// Pre-order listing of `root`, `<kind> <short>` per line with `indent`
/// repeated once per depth level.
pub fn dump_tree(root: Node<'_>, source: &str, indent: &str) -> String {
    let mut out = String::new();
    let mut pending = vec![(root, 0usize)];
    while let Some((node, depth)) = pending.pop() {
        for _ in 0..depth {
            out.push_str(indent);
        }
        let _ = writeln!(out, "{} {}", node.kind(), short(node, source));
        pending.extend(
            named_children(node)
                .into_iter()
                .rev()
                .map(|child| (child, depth + 1)),
        );
    }
    out
}

/// Declared name for declarations, text for identifiers, package for files.
fn short<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    match node.kind() {
        "function_declaration" | "method_declaration" | "type_spec" | "type_alias" => node
            .child_by_field_name("name")
            .map(|name| text(name, source))
            .unwrap_or(""),
        "identifier" | "type_identifier" | "field_identifier" | "package_identifier" => {
            text(node, source)
        }
        "source_file" => named_children(node)
            .into_iter()
            .find(|child| child.kind() == "package_clause")
            .and_then(|clause| named_children(clause).into_iter().next())
            .map(|name| text(name, source))
            .unwrap_or(""),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parsers::parse_go;

    #[test]
    fn lists_kinds_with_short_names() {
        let src = "package demo\n\nfunc run() {}\n";
        let parsed = parse_go(src, Path::new("demo.go")).unwrap();
        let listing = dump_tree(parsed.tree.root_node(), src, "  ");
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "source_file demo");
        assert_eq!(lines[1], "  package_clause ");
        assert_eq!(lines[2], "    package_identifier demo");
        assert!(lines.contains(&"  function_declaration run"));
        assert!(lines.contains(&"    identifier run"));
    }

    #[test]
    fn indent_string_repeats_per_depth() {
        let src = "package demo\n";
        let parsed = parse_go(src, Path::new("demo.go")).unwrap();
        let listing = dump_tree(parsed.tree.root_node(), src, "..");
        assert_eq!(listing, "source_file demo\n..package_clause \n....package_identifier demo\n");
    }

    #[test]
    fn deep_operator_chains_are_listed_in_full() {
        let src = format!("package demo\n\nvar x = 1{}\n", " + 1".repeat(10_000));
        let parsed = parse_go(&src, Path::new("demo.go")).unwrap();
        let listing = dump_tree(parsed.tree.root_node(), &src, "");
        let chained = listing
            .lines()
            .filter(|line| line.starts_with("binary_expression"))
            .count();
        assert_eq!(chained, 10_000);
    }
}
