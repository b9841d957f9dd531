//! Auxiliary per-module tools: declaration counts and syntax listings.

pub mod ast_dump;
pub mod stats;

pub use ast_dump::dump_tree;
pub use stats::DeclarationStats;
