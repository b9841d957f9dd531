//! Error-tolerant parsing: locate the damaged regions of a recovered tree.

use serde::Serialize;
use tree_sitter::Node;

/// Location of one ERROR or MISSING node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorSpan {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based line of the start of the span.
    pub line: u32,
    /// 1-based byte column of the start of the span.
    pub column: u32,
    pub missing: bool,
}

impl ErrorSpan {
    fn from_node(node: &Node) -> Self {
        let start = node.start_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            line: start.row as u32 + 1,
            column: start.column as u32 + 1,
            missing: node.is_missing(),
        }
    }
}

/// Count ERROR and MISSING nodes in a tree-sitter tree.
pub fn count_errors(root: Node) -> (u32, Vec<ErrorSpan>) {
    let mut count = 0u32;
    let mut spans = Vec::new();
    if root.has_error() {
        collect_errors(root, &mut count, &mut spans);
    }
    (count, spans)
}

fn collect_errors(root: Node, count: &mut u32, spans: &mut Vec<ErrorSpan>) {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            *count += 1;
            spans.push(ErrorSpan::from_node(&node));
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                if child.has_error() || child.is_missing() {
                    pending.push(child);
                }
            }
        }
    }
}

/// Check if a node sits inside an ERROR subtree.
pub fn is_in_error(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.is_error() {
            return true;
        }
        current = parent.parent();
    }
    false
}
