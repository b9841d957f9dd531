//! Go parser.

use std::cell::RefCell;
use std::path::Path;

use cohesion_core::errors::LoadError;
use tree_sitter::{Parser, Tree};

use super::error_tolerant::{count_errors, ErrorSpan};

thread_local! {
    static GO_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

/// A parsed Go file together with its syntax error summary.
pub struct ParsedFile {
    pub tree: Tree,
    pub error_count: u32,
    pub error_spans: Vec<ErrorSpan>,
}

/// Parse Go source with this thread's parser, creating it on first use.
///
/// Syntax errors do not fail the parse: tree-sitter recovers and marks the
/// damaged regions with ERROR/MISSING nodes, which are counted here.
pub fn parse_go(source: &str, path: &Path) -> Result<ParsedFile, LoadError> {
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(new_go_parser(path)?);
        }
        let Some(parser) = slot.as_mut() else {
            return Err(LoadError::Parse {
                path: path.to_path_buf(),
                message: "Go parser unavailable".to_string(),
            });
        };

        let tree = parser.parse(source, None).ok_or_else(|| LoadError::Parse {
            path: path.to_path_buf(),
            message: "parser returned no tree".to_string(),
        })?;

        let (error_count, error_spans) = count_errors(tree.root_node());
        Ok(ParsedFile {
            tree,
            error_count,
            error_spans,
        })
    })
}

fn new_go_parser(path: &Path) -> Result<Parser, LoadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: format!("failed to load Go grammar: {e}"),
        })?;
    Ok(parser)
}

/// Package name declared by the file's `package` clause, if present.
pub fn package_name<'s>(tree: &Tree, source: &'s str) -> Option<&'s str> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|n| n.kind() == "package_clause")?;
    let mut clause_cursor = clause.walk();
    let name = clause
        .named_children(&mut clause_cursor)
        .find(|n| n.kind() == "package_identifier")?;
    name.utf8_text(source.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_go_without_errors() {
        let src = "package demo\n\nfunc a() { b() }\nfunc b() {}\n";
        let parsed = parse_go(src, Path::new("demo.go")).unwrap();
        assert_eq!(parsed.error_count, 0);
        assert_eq!(parsed.tree.root_node().kind(), "source_file");
        assert_eq!(package_name(&parsed.tree, src), Some("demo"));
    }

    #[test]
    fn broken_go_still_yields_a_tree() {
        let src = "package demo\n\nfunc a() { b( }\n";
        let parsed = parse_go(src, Path::new("broken.go")).unwrap();
        assert!(parsed.error_count > 0);
        assert!(!parsed.error_spans.is_empty());
        assert_eq!(package_name(&parsed.tree, src), Some("demo"));
    }

    #[test]
    fn parser_is_reused_across_calls() {
        for i in 0..3 {
            let src = format!("package p{i}\n");
            let parsed = parse_go(&src, Path::new("p.go")).unwrap();
            assert_eq!(parsed.error_count, 0);
        }
    }
}
