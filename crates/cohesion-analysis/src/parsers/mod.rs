//! Tree-sitter parser subsystem: Go grammar, thread_local parser instances.

pub mod error_tolerant;
pub mod go;

pub use go::{parse_go, ParsedFile};
