//! cohesion-analysis: measures how cohesive Go packages are.
//!
//! Each package is parsed with tree-sitter and resolved up front. A graph of
//! references between its own functions, methods, types and package-level
//! variables and constants is then built, and metrics are read off it.

pub mod cohesion;
pub mod loader;
pub mod parsers;
pub mod pipeline;
pub mod reports;
pub mod semantics;
pub mod tools;

pub use cohesion::{CohesionSummary, CohesionVisitor, DependencyGraph};
pub use loader::{LoadedModule, ModuleLoader};
pub use pipeline::{analyze_module, run, Analysis, ModuleOutput, ModuleReport};
pub use semantics::{ModuleSemantics, Symbol, SymbolResolver};
