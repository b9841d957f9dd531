//! Lexical block stack for function bodies.

use cohesion_core::types::collections::FxHashMap;

use super::symbols::SymbolId;

/// Nested local blocks, innermost last. Package and universe blocks are
/// looked up separately by the resolver.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    frames: Vec<FxHashMap<String, SymbolId>>,
}

impl ScopeStack {
    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Declare `name` in the innermost block. A no-op outside any block.
    pub fn declare(&mut self, name: &str, id: SymbolId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), id);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.frames.iter().rev().find_map(|frame| frame.get(name).copied())
    }

    /// Declaration of `name` in the innermost block only.
    pub fn innermost(&self, name: &str) -> Option<SymbolId> {
        self.frames.last().and_then(|frame| frame.get(name).copied())
    }
}
